//! Example: Parse and inspect an IES file.
//!
//! Run with: cargo run --example inspect_ies -- path/to/luminaire.ies [--json]

use std::env;

use lux_core::ies::{IesRecord, IntensityMode};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_ies <path-to-ies-file> [--json]");
        println!("\nExamples:");
        println!("  cargo run --example inspect_ies -- luminaire.ies");
        println!("  cargo run --example inspect_ies -- luminaire.ies --json");
        return Ok(());
    }

    let path = &args[1];
    let content = std::fs::read_to_string(path)?;
    let ies = IesRecord::parse(&content)?;

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&ies)?);
        return Ok(());
    }

    let props = ies.properties();
    println!("\n=== {} ===", path);
    println!("Version: {}", ies.version());
    println!("Tilt: {:?}", ies.tilt());

    println!("\n--- Keywords ---");
    for (key, value) in ies.keywords().iter() {
        println!("  [{}] {}", key.to_uppercase(), value.replace('\n', " / "));
    }

    println!("\n--- Photometry ---");
    println!("  Lamps: {} x {} lm", props.lamps, props.lumens_per_lamp);
    println!("  Type: {:?}", props.photometric_type);
    println!(
        "  Opening: {} x {} x {} {} ({})",
        props.width,
        props.length,
        props.height,
        props.unit(),
        props.luminaire_type.as_str()
    );
    println!(
        "  Angles: {} vertical, {} horizontal",
        props.total_vertical_angles, props.total_horizontal_angles
    );
    println!("  Input: {} W, ballast factor {}", props.input_watts, props.ballast_factor);
    match props.color_temperature {
        Some(k) => println!("  Color temperature: {} K", k),
        None => println!("  Color temperature: unknown"),
    }

    println!("\n--- Peak ---");
    let peak = props.peak_value;
    println!("  {} {}", ies.value(peak, IntensityMode::Candela)?, IntensityMode::Candela);
    match ies.value(peak, IntensityMode::CandelaPerKilolumen) {
        Ok(v) => println!("  {} {}", v, IntensityMode::CandelaPerKilolumen),
        Err(e) => println!("  {}", e),
    }

    println!("\n--- C0 / C90 planes ---");
    for angle in [0.0, 90.0] {
        let index = ies.index(angle);
        println!(
            "  C{}: {:?}",
            props.horizontal_angles[index],
            ies.plane(angle)
        );
    }

    Ok(())
}
