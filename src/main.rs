use clap::Parser;
use std::path::{Path, PathBuf};
use student_roster::config::Command;
use student_roster::utils::{logger, validation::Validate};
use student_roster::{
    CliConfig, RosterConfig, RosterError, RosterFilter, RosterManager, StudentRecord,
};

fn main() {
    let cli = CliConfig::parse();

    let config = match RosterConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let data_file = cli
        .data
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.data_file()));

    if let Err(e) = run(&cli.command, &data_file) {
        tracing::error!(
            "❌ {} failed: {} (Category: {:?})",
            command_name(&cli.command),
            e,
            e.category()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn run(command: &Command, data_file: &Path) -> Result<(), RosterError> {
    let mut roster = RosterManager::new();
    roster.load_from_json(data_file)?;

    match command {
        Command::List => print_records(roster.iter().enumerate()),
        Command::Add(args) => {
            roster.add(args.to_record()?)?;
            println!("✅ Added student #{}", roster.len() - 1);
        }
        Command::Update { index, record } => {
            let record = record.to_record()?;
            roster.update(*index, record)?;
            if roster.has_unsaved_changes() {
                println!("✅ Updated student #{}", index);
            } else {
                println!("⚠️ No student at index {}, nothing changed", index);
            }
        }
        Command::Remove { index } => {
            roster.remove(*index);
            if roster.has_unsaved_changes() {
                println!("✅ Removed student #{}", index);
            } else {
                println!("⚠️ No student at index {}, nothing changed", index);
            }
        }
        Command::Filter {
            course,
            group,
            last_name,
        } => {
            // 顯示原始索引，方便後續 update/remove
            let filter = RosterFilter {
                course: *course,
                group: group.clone(),
                last_name: last_name.clone(),
            };
            let matched: Vec<_> = roster.indexed_matches(&filter).collect();
            let count = matched.len();
            print_records(matched.into_iter());
            println!("{} of {} students match", count, roster.len());
        }
        Command::Import { path } => {
            let result = roster.import_from_csv(path);
            // 已匯入的記錄仍然保存
            if roster.has_unsaved_changes() {
                roster.save_to_json(data_file)?;
            }
            let imported = result?;
            println!("✅ Imported {} students from {}", imported, path.display());
            return Ok(());
        }
        Command::Export { path } => {
            roster.export_to_csv(path)?;
            println!("✅ Exported {} students to {}", roster.len(), path.display());
        }
        Command::SaveAs { path } => {
            roster.save_to_json(path)?;
            println!("✅ Saved {} students to {}", roster.len(), path.display());
        }
    }

    if command.is_mutating() && roster.has_unsaved_changes() {
        roster.save_to_json(data_file)?;
        tracing::info!("📁 Roster saved to {}", data_file.display());
    }

    Ok(())
}

fn print_records<'a>(records: impl Iterator<Item = (usize, &'a StudentRecord)>) {
    for (index, record) in records {
        println!(
            "{:>3}  {:<16} {:<14} {:<16} {:>1}  {:<8} {}  {}",
            index,
            record.last_name,
            record.first_name,
            record.middle_name,
            record.course,
            record.group,
            record.birth_date().format("%d.%m.%Y"),
            record.email()
        );
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Add(_) => "add",
        Command::Update { .. } => "update",
        Command::Remove { .. } => "remove",
        Command::Filter { .. } => "filter",
        Command::Import { .. } => "import",
        Command::Export { .. } => "export",
        Command::SaveAs { .. } => "save-as",
    }
}
