extern crate clap;
extern crate magnons;
extern crate netlib_src;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;

use std::error::Error;
use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;
use std::process;
use magnons::convention::Convention;
use magnons::io::txt;
use magnons::lswt::Lswt;
use magnons::mat3::Mat3;
use magnons::vecn::Vec3;

/// Piecewise-linear path through reciprocal space, with vertices in
/// fractional coordinates of the reciprocal cell.
#[derive(Clone, Debug, Deserialize)]
struct KPath {
    points: Vec<KVertex>,
    steps: usize,
}

#[derive(Clone, Debug, Deserialize)]
struct KVertex {
    name: String,
    k: [f64; 3],
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = clap::App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .args_from_usage("--input=<input> 'Spin Hamiltonian model file \
                          (txt, optionally .gz or .xz)'")
        .args_from_usage("--kpath=<kpath> 'YAML file with the reciprocal \
                          path vertices and step count'")
        .args_from_usage("[--convention=<convention>] 'Predefined parameter \
                          convention of the input (default: tb2j)'")
        .args_from_usage("[--field=<field>] 'Uniform magnetic field \
                          hx,hy,hz in tesla'")
        .args_from_usage("[--output=<output>] 'Write the dispersion as \
                          YAML to this file'")
        .get_matches();

    let input = matches.value_of("input").unwrap();
    let convention = Convention::get_predefined(
        matches.value_of("convention").unwrap_or("tb2j"),
    )?;
    let mut hamiltonian = txt::load_txt(input.as_ref(), convention)?;
    if let Some(field) = matches.value_of("field") {
        hamiltonian.add_magnetic_field(parse_field(field)?)?;
    }

    let atoms = hamiltonian.atoms();
    let mut directions = Vec::with_capacity(atoms.len());
    for alpha in 0 .. atoms.len() {
        let direction = atoms.spin_vector(alpha).normalized()
            .ok_or_else(|| format!(
                "atom '{}' has no spin direction in the model file",
                atoms.fullname(alpha),
            ))?;
        directions.push(direction);
    }

    let kpath: KPath = serde_yaml::from_reader(
        File::open(matches.value_of("kpath").unwrap())?,
    )?;
    let ks = sample_path(&hamiltonian.cell(), &kpath)?;

    println!("model: {}", input);
    let names: Vec<&str> =
        kpath.points.iter().map(|v| v.name.as_str()).collect();
    println!("kpath: {}", names.join("-"));
    println!("convention: {}", hamiltonian.convention().name());
    println!("sublattices: {}", atoms.len());
    println!("classical_energy: {}",
             hamiltonian.classical_energy(&directions)?);

    let lswt = Lswt::new(&hamiltonian, &directions)?;
    let dispersion = lswt.dispersion(&ks, true)?;
    println!("dispersion:");
    for (k, omegas) in dispersion.kpoints.iter().zip(&dispersion.omegas) {
        println!("- {{k: [{:.6}, {:.6}, {:.6}], omega: {:?}}}",
                 k[0], k[1], k[2], omegas);
    }

    if let Some(output) = matches.value_of("output") {
        serde_yaml::to_writer(File::create(Path::new(output))?, &dispersion)?;
    }
    Ok(())
}

fn parse_field(s: &str) -> Result<Vec3<f64>, Box<dyn Error>> {
    let parts: Result<Vec<f64>, _> =
        s.split(',').map(|x| x.trim().parse()).collect();
    let parts = parts.map_err(|_| format!("bad field '{}'", s))?;
    if parts.len() != 3 {
        return Err(format!("field must have three components: '{}'", s)
                   .into());
    }
    Ok(Vec3::new(parts[0], parts[1], parts[2]))
}

/// Interpolate `steps` points per segment between consecutive vertices,
/// converting fractional reciprocal coordinates to absolute Å⁻¹.
fn sample_path(cell: &Mat3, kpath: &KPath)
               -> Result<Vec<Vec3<f64>>, Box<dyn Error>>
{
    if kpath.points.len() < 2 {
        return Err("k-path needs at least two vertices".into());
    }
    if kpath.steps == 0 {
        return Err("k-path step count must be positive".into());
    }
    // rows of B = 2π (cell⁻¹)ᵀ are the reciprocal lattice vectors
    let reciprocal = cell.inverse()
        .ok_or("lattice cell is singular")?
        .transpose()
        .scale(2.0 * PI);
    let absolute = |v: &[f64; 3]| {
        reciprocal.transpose().mul_vec(Vec3::new(v[0], v[1], v[2]))
    };
    let mut ks = Vec::new();
    for pair in kpath.points.windows(2) {
        let start = absolute(&pair[0].k);
        let end = absolute(&pair[1].k);
        for step in 0 .. kpath.steps {
            let t = step as f64 / kpath.steps as f64;
            ks.push(start + (end - start) * t);
        }
    }
    ks.push(absolute(&kpath.points[kpath.points.len() - 1].k));
    Ok(ks)
}
