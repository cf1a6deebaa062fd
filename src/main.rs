use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};
use std::path::Path;
use version_updater::{
    arguments::{Arguments, ColorChoice, Command, UpdateArguments},
    bump::resolve_new_version,
    config::{CONFIG_FILE_NAME, Configuration},
    init::{InitOutcome, run_init},
    output::{Layout, MessageKind, Style, format_file_entry, format_message, plural},
    propagation::propagate_with,
    report::{Highlight, render_findings},
};

fn main() -> Result<()> {
    let args = Arguments::parse();
    pretty_env_logger::env_logger::builder()
        .filter_level(if args.debug { LevelFilter::Debug } else { LevelFilter::Info })
        .format_timestamp(None)
        .init();

    let root: &Path = args.path.as_ref();

    match args.command {
        None => {
            let configuration = Configuration::load(root)?;
            println!("current: {}", configuration.current_version);
        }
        Some(Command::Init(init)) => {
            if run_init(root, &init.into())? == InitOutcome::Unchanged {
                info!("Nothing to change in {}", CONFIG_FILE_NAME);
            }
        }
        Some(Command::List { current }) => list_files(root, current)?,
        Some(Command::Update(update)) => update_version(root, &update)?,
    }

    Ok(())
}

fn list_files(root: &Path, current: bool) -> Result<()> {
    let configuration = Configuration::load(root)?;
    let style = Style { color: ColorChoice::Auto.enabled() };
    info!("Loaded {}; current filesList:", CONFIG_FILE_NAME);

    if current {
        let text = format!("Current version of {}: {}", configuration.name, configuration.current_version);
        println!("{}", format_message(&text, MessageKind::Completed, Layout::Spaced, style));
    }
    for (index, file) in configuration.files_list.iter().enumerate() {
        let entry = format_file_entry(index + 1, &file.name, file.file_type());
        println!("{}", format_message(&entry, MessageKind::Important, Layout::Spaced, style));
    }

    let count = configuration.files_list.len();
    let text = format!("There are {} {} in filesList", count, plural(count, "file", "files"));
    println!("{}", format_message(&text, MessageKind::Completed, Layout::Spaced, style));
    Ok(())
}

fn update_version(root: &Path, args: &UpdateArguments) -> Result<()> {
    let mut configuration = Configuration::load(root)?;
    info!("loaded configuration ({})", CONFIG_FILE_NAME);

    let new_version = resolve_new_version(
        args.new_version.as_deref(),
        &configuration.current_version,
        &args.increment(),
    )?;
    info!("will now update project to version {}", new_version);

    let options = args.propagate_options();
    let highlight = if args.color.enabled() { Highlight::Ansi } else { Highlight::Plain };
    propagate_with(root, &mut configuration, &new_version, &options, |report| {
        for line in render_findings(report, &options, &new_version, highlight) {
            println!("{line}");
        }
    })?;
    Ok(())
}
