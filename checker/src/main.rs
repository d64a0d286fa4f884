mod cli;

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use dt_binding::{BindingModel, Particle};

fn print_particle(label: &str, particle: &Particle) {
    let (min, max) = particle.effective_total_range();
    let emptiable = if particle.is_emptiable() { ", emptiable" } else { "" };
    println!("{label} ({min}..{max} elements{emptiable}):");
    print!("{particle}");
}

// invalid properties were already reported
fn print_content_models(model: &BindingModel, scope: cli::ContentModel) {
    for bean in model.beans() {
        match scope {
            cli::ContentModel::None => {}
            cli::ContentModel::Choices => {
                let choices = bean.properties.iter().filter(|p| p.rendering.choice().is_some());
                for property in choices {
                    if let Ok(info) = model.introspect(&bean.name, &property.name) {
                        let label = format!("{}.{}", bean.name, property.name);
                        print_particle(&label, &info.content_model());
                    }
                }
            }
            cli::ContentModel::All => {
                if let Ok(particle) = model.content_model(&bean.name) {
                    print_particle(&bean.name, &particle);
                }
            }
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::init();
    let cli = cli::Cli::parse();

    let source = std::fs::read_to_string(&cli.input)?;
    let options = roxmltree::ParsingOptions {
        allow_dtd: cli.allow_dtd,
        ..Default::default()
    };
    let document = roxmltree::Document::parse_with_options(&source, options)?;
    let model = dt_binding::read_bindings(&document)?;
    info!("Read {} bean types from {}", model.beans().count(), cli.input);

    let status = match model.validate() {
        Ok(()) => ExitCode::SUCCESS,
        Err(diagnostics) => {
            for diagnostic in diagnostics.iter() {
                eprintln!("error: {diagnostic}");
            }
            eprintln!("{} error(s) in {}", diagnostics.len(), cli.input);
            ExitCode::FAILURE
        }
    };

    if cli.content_model != cli::ContentModel::None {
        print_content_models(&model, cli.content_model);
    }
    Ok(status)
}
