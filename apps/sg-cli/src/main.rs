use clap::{Parser, Subcommand};
use sg_chem::{
    ChemError, EstimatorConfig, InitialGuess, SolveLevel, element_populations, estimate_at,
    estimate_grid, evaluate_equilibrium_constants,
};
use sg_core::{dyn_cm2, k};
use sg_model::ModelError;
use sg_species::{Catalog, Composition, Element, SpeciesError, builtin};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "sg-cli")]
#[command(about = "StellarGas CLI - LTE chemical equilibrium for stellar atmospheres", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model file
    Validate {
        /// Path to the model file (YAML or JSON)
        model_path: PathBuf,
    },
    /// Estimate electron and partial pressures at a single point
    Estimate {
        /// Temperature [K]
        #[arg(long)]
        temperature: f64,
        /// Total gas pressure [dyn/cm²]
        #[arg(long)]
        pressure: f64,
        /// Solve level (major_only or major_and_minor)
        #[arg(long, default_value = "major_and_minor")]
        level: SolveLevel,
        /// Pure single-element gas instead of the solar mixture
        #[arg(long)]
        element: Option<String>,
    },
    /// Run the estimator over every depth of a model
    Run {
        /// Path to the model file (YAML or JSON)
        model_path: PathBuf,
        /// Also report ionization fractions of this element
        #[arg(long)]
        element: Option<String>,
        /// Output CSV file path (optional, defaults to a table on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List tracked species, or show one with its equilibrium constant
    Species {
        /// Species name or ion label (e.g. CO, Fe++, H-)
        #[arg(long)]
        query: Option<String>,
        /// Temperature for the equilibrium constant [K]
        #[arg(long, default_value_t = 5000.0)]
        temperature: f64,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Chem(#[from] ChemError),

    #[error(transparent)]
    Species(#[from] SpeciesError),

    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { model_path } => cmd_validate(&model_path),
        Commands::Estimate {
            temperature,
            pressure,
            level,
            element,
        } => cmd_estimate(temperature, pressure, level, element.as_deref()),
        Commands::Run {
            model_path,
            element,
            output,
        } => cmd_run(&model_path, element.as_deref(), output.as_deref()),
        Commands::Species { query, temperature } => cmd_species(query.as_deref(), temperature),
    }
}

fn parse_element(symbol: &str) -> CliResult<Element> {
    symbol
        .parse()
        .map_err(|_| CliError::UnknownElement(symbol.to_string()))
}

fn cmd_validate(model_path: &Path) -> CliResult<()> {
    println!("Validating model: {}", model_path.display());
    let model = sg_model::load(model_path)?;
    sg_model::to_grid(&model)?;
    println!(
        "✓ Model is valid ({} depths, level {})",
        model.depths.len(),
        model.solve_level.as_str()
    );
    Ok(())
}

fn cmd_estimate(temperature: f64, pressure: f64, level: SolveLevel, element: Option<&str>) -> CliResult<()> {
    let composition = match element {
        Some(symbol) => Composition::pure(parse_element(symbol)?),
        None => Composition::solar(),
    };

    let guess = estimate_at(
        k(temperature),
        dyn_cm2(pressure),
        level,
        &composition,
        builtin().registry(),
        &EstimatorConfig::default(),
    )?;

    println!("T = {:.1} K, Pt = {:.4e} dyn/cm²", temperature, pressure);
    println!("  Seeds: PeH = {:.4e}, PeM = {:.4e}", guess.seed.peh, guess.seed.pem);
    println!("  Pe  = {:.4e} dyn/cm² ({})", guess.pe(), guess.convergence());
    println!("  Pd  = {:.4e} dyn/cm²", guess.pd);
    println!("  PH2 = {:.4e} dyn/cm²", guess.p_h2);
    println!("  Equations: {}", guess.equation_count);
    println!("\nNeutral partial pressures [dyn/cm²]:");
    for (e, _) in composition.iter() {
        let p = guess.partial_pressure(e);
        if p > 0.0 {
            println!("  {:<3} {:.4e}", e.symbol(), p);
        }
    }
    Ok(())
}

fn cmd_run(model_path: &Path, element: Option<&str>, output: Option<&Path>) -> CliResult<()> {
    let model = sg_model::load(model_path)?;
    println!("Running model: {}", model.name);

    let base_dir = model_path.parent().unwrap_or(Path::new("."));
    let catalog = sg_model::catalog_for(&model, base_dir)?;
    let grid = sg_model::to_grid(&model)?;
    let config = sg_model::estimator_config(&model);

    let start = Instant::now();
    let guesses = estimate_grid(&grid, model.solve_level, catalog.registry(), &config)?;
    info!(
        depths = guesses.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "grid estimate finished"
    );

    let stages = match element {
        Some(symbol) => {
            let e = parse_element(symbol)?;
            Some((e, stage_fractions(&catalog, &grid, &guesses, e)?))
        }
        None => None,
    };

    let csv = render_csv(&grid, &guesses, stages.as_ref());
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!("✓ Wrote {} depths to {}", guesses.len(), path.display());
    } else {
        print_table(&guesses, stages.as_ref());
    }

    let unconverged = guesses.iter().filter(|g| !g.convergence().is_converged()).count();
    if unconverged > 0 {
        println!("! {} of {} depths reached the round cap", unconverged, guesses.len());
    }
    Ok(())
}

/// Linear stage fractions of `element`, one row per stage.
fn stage_fractions(
    catalog: &Catalog,
    grid: &sg_chem::AtmosphereDepthGrid,
    guesses: &[InitialGuess],
    element: Element,
) -> CliResult<Vec<Vec<f64>>> {
    let pops = element_populations(grid, guesses, element, catalog)?;
    Ok((0..pops.stage_count())
        .map(|s| pops.ln_fraction(s).iter().map(|f| f.exp()).collect())
        .collect())
}

fn render_csv(
    grid: &sg_chem::AtmosphereDepthGrid,
    guesses: &[InitialGuess],
    stages: Option<&(Element, Vec<Vec<f64>>)>,
) -> String {
    let mut csv = String::from("depth,temperature_k,pressure_dyn_cm2,pe,pd,p_h2,status");
    if let Some((e, fractions)) = stages {
        for s in 0..fractions.len() {
            csv.push_str(&format!(",{}_{}", e.symbol(), roman(s)));
        }
    }
    csv.push('\n');

    for (d, g) in guesses.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:e},{:e},{:e},{}",
            d,
            grid.temperatures()[d],
            grid.pressures()[d],
            g.pe(),
            g.pd,
            g.p_h2,
            g.convergence()
        ));
        if let Some((_, fractions)) = stages {
            for stage in fractions {
                csv.push_str(&format!(",{:e}", stage[d]));
            }
        }
        csv.push('\n');
    }
    csv
}

fn print_table(guesses: &[InitialGuess], stages: Option<&(Element, Vec<Vec<f64>>)>) {
    print!(
        "{:>5} {:>9} {:>11} {:>11} {:>11}",
        "depth", "T [K]", "Pt", "Pe", "Pd"
    );
    if let Some((e, fractions)) = stages {
        for s in 0..fractions.len() {
            print!(" {:>10}", format!("{} {}", e.symbol(), roman(s)));
        }
    }
    println!("  status");

    for (d, g) in guesses.iter().enumerate() {
        print!(
            "{:>5} {:>9.1} {:>11.4e} {:>11.4e} {:>11.4e}",
            d,
            g.state.temperature,
            g.state.total_pressure,
            g.pe(),
            g.pd
        );
        if let Some((_, fractions)) = stages {
            for stage in fractions {
                print!(" {:>10.3e}", stage[d]);
            }
        }
        println!("  {}", g.convergence());
    }
}

/// Spectroscopic stage label: 0 -> I, 1 -> II, ...
fn roman(stage: usize) -> &'static str {
    const LABELS: [&str; 6] = ["I", "II", "III", "IV", "V", "VI"];
    LABELS.get(stage).copied().unwrap_or("?")
}

fn cmd_species(query: Option<&str>, temperature: f64) -> CliResult<()> {
    let registry = builtin().registry();

    let Some(query) = query else {
        println!("Tracked species ({}):", registry.len());
        for (id, def) in registry.iter() {
            println!(
                "  {:>3} {:<6} {:<14} {:?}",
                id.index(),
                def.name,
                def.kind.label(),
                def.priority
            );
        }
        return Ok(());
    };

    let id = registry.lookup(query)?;
    let Some(def) = registry.get(id) else {
        return Err(SpeciesError::Unknown {
            what: "species",
            name: query.to_string(),
        }
        .into());
    };
    let eq = evaluate_equilibrium_constants(registry, temperature);

    println!("{} ({})", def.name, def.kind.label());
    println!("  Parent: {} ({})", def.parent().display_name(), def.parent());
    println!("  Charge: {}", def.charge());
    println!("  Priority: {:?}", def.priority);
    println!(
        "  K({:.0} K) = {:.4e}, ionization factor {}",
        eq.temperature(),
        eq.constant(id),
        eq.factor(id)
    );
    Ok(())
}
