use std::fs;

use anyhow::{Context, Result};
use catena::chain::{build_chain, splice_zones};
use catena::resolver::DigResolver;
use catena::serialize;
use catena::zone::{Exit, Terminal, Zone};
use catena_proto::Name;
use owo_colors::OwoColorize;

mod args;

use args::Args;

fn main() -> Result<()> {
    let output_stream = owo_colors::Stream::Stdout;
    let args = Args::parse();
    let resolver = DigResolver::new(&args.server);

    let mut out = Vec::new();
    serialize::write_header(&mut out)?;

    let mut target = args.target.clone();
    let mut previous: Option<Vec<Name>> = None;
    loop {
        let zones = build_chain(&resolver, &target)
            .with_context(|| format!("Could not build the chain for {}", target))?;

        println!(
            "{}",
            format!("Zone listing for {}", target)
                .if_supports_color(output_stream, |s| s.bold())
        );
        for zone in &zones {
            println!("  {}", zone.name);
        }

        let redirect = next_target(&zones, &target);
        if let Some(next) = &redirect {
            println!("{} is a CNAME for {}", target, next);
        }

        let path: Vec<Name> = zones.iter().map(|zone| zone.name.clone()).collect();
        let zones = match &previous {
            Some(previous_path) => splice_zones(zones, previous_path),
            None => zones,
        };

        for (i, zone) in zones.iter().enumerate() {
            let next_name = match zones.get(i + 1) {
                Some(next) => next.name.clone(),
                None => target.clone(),
            };
            if zone.direct_key {
                println!("  using direct keying for {}", zone.name);
            }
            serialize::write_zone(&mut out, zone, &next_name)
                .with_context(|| format!("Could not serialise the zone {}", zone.name))?;
            println!("After {}: {} bytes", zone.name, out.len());
        }

        match redirect {
            Some(next) => {
                println!("Building new chain targetting {}", next);
                previous = Some(path);
                target = next;
            }
            None => break,
        }
    }

    fs::write(&args.output, &out)
        .with_context(|| format!("Could not write {}", args.output.display()))?;
    println!(
        "{}",
        format!("Wrote {} bytes to {}", out.len(), args.output.display())
            .if_supports_color(output_stream, |s| s.green())
    );

    Ok(())
}

/// Inspects the terminal of a freshly built chain: returns the canonical
/// name to chase next for a CNAME terminal, and surfaces a warning for a
/// TXT terminal that carries no usable policy (the chain is still built).
fn next_target(zones: &[Zone], target: &Name) -> Option<Name> {
    match zones.last().map(|zone| &zone.exit) {
        Some(Exit::Terminal(Terminal::Cname { target: next, .. })) => Some(next.clone()),
        Some(Exit::Terminal(Terminal::Txt { records, .. })) => {
            if !records.iter().any(|txt| txt.has_tls_policy()) {
                eprintln!(
                    "{}",
                    format!("No usable TXT records at {}", target)
                        .if_supports_color(owo_colors::Stream::Stderr, |s| s.yellow())
                );
            }
            None
        }
        _ => None,
    }
}
