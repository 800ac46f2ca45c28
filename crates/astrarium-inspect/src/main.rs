use std::path::PathBuf;
use std::process;

use astrarium_core::seed::parse_seed;
use astrarium_core::types::{chunk_key, parse_chunk_key};
use astrarium_core::GenerationContext;
use astrarium_gen::ChunkGenerator;
use astrarium_inspect::inspector::{inspect_region, region_around, MAX_INSPECT_RADIUS};
use astrarium_inspect::report;
use glam::IVec2;

fn usage() {
    eprintln!("Usage: seed-inspector [OPTIONS]");
    eprintln!("  --seed <n|text>     Universe seed, numeric or any text (default: 42)");
    eprintln!("  --center <cx,cy>    Center chunk (default: 0,0)");
    eprintln!("  --radius <r>        Chunks around the center to inspect, at most {MAX_INSPECT_RADIUS} (default: 2)");
    eprintln!("  --output <path>     Save the report as JSON");
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    usage();
    process::exit(1);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut context = GenerationContext::default();
    let mut center = IVec2::ZERO;
    let mut radius = 2i32;
    let mut output_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .cloned()
                .unwrap_or_else(|| fail(&format!("missing value for {}", args[i])))
        };
        match args[i].as_str() {
            "--seed" => {
                context = GenerationContext::new(parse_seed(&value(i)));
                i += 1;
            }
            "--center" => {
                let text = value(i);
                center = parse_chunk_key(&text)
                    .unwrap_or_else(|| fail(&format!("invalid --center value '{text}'")));
                i += 1;
            }
            "--radius" => {
                let text = value(i);
                radius = text
                    .parse::<i32>()
                    .ok()
                    .filter(|r| (0..=MAX_INSPECT_RADIUS).contains(r))
                    .unwrap_or_else(|| fail(&format!("invalid --radius value '{text}'")));
                i += 1;
            }
            "--output" => {
                output_path = Some(PathBuf::from(value(i)));
                i += 1;
            }
            "--help" | "-h" => {
                usage();
                process::exit(0);
            }
            other => fail(&format!("Unknown argument: {other}")),
        }
        i += 1;
    }

    let generator = match ChunkGenerator::builtin() {
        Ok(generator) => generator,
        Err(e) => {
            log::error!("Built-in tables are unusable: {e}");
            process::exit(1);
        }
    };

    log::info!(
        "Inspecting universe {} around chunk {} (radius {})",
        context.seed,
        chunk_key(center),
        radius
    );
    let (min, max) = region_around(center, radius);
    let region = match inspect_region(&generator, &context, min, max) {
        Ok(region) => region,
        Err(e) => {
            log::error!("Generation failed: {e}");
            process::exit(1);
        }
    };

    println!("\n## Seed Inspection\n");
    println!("{}", report::format_markdown(&region));

    if let Some(ref path) = output_path {
        match report::save_report(path, &region) {
            Ok(()) => log::info!("Saved report to {}", path.display()),
            Err(e) => {
                log::error!("Failed to save report to {}: {e}", path.display());
                process::exit(1);
            }
        }
    }
}
