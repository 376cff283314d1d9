//! Command-line front end for the glossary.
//!
//! # Responsibility
//! - Map subcommands onto `TermStore` operations against a SQLite file.
//! - Report absence as a message and storage failures as a non-zero exit.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use idioticon_core::db::open_db;
use idioticon_core::{
    core_version, default_log_level, init_logging, render_term_tag, IdioticonConfig,
    IdioticonSettings, SqliteTermRepository, Term, TermKind, TermListQuery, TermStore,
};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "idioticon", version = core_version(), about = "Glossary terms and aliases")]
struct Cli {
    /// SQLite database file.
    #[arg(long, default_value = "idioticon.sqlite3", global = true)]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Icon theme used by `render` (`plain` or `bootstrap`).
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a term; aliases resolve to their main term.
    Get {
        key: String,
        /// Show the alias record itself.
        #[arg(long)]
        no_resolve: bool,
    },
    /// Add a main term unless the key is taken.
    Add {
        key: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Create or update a term.
    Set {
        key: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Update an existing term.
    Update {
        key: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a term and, by default, its aliases.
    Delete {
        key: String,
        #[arg(long)]
        keep_aliases: bool,
    },
    /// Make ALIAS an alias of MAIN.
    Alias {
        main: String,
        alias: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// List terms ordered by key.
    List {
        #[arg(long, conflicts_with = "aliases")]
        main: bool,
        #[arg(long)]
        aliases: bool,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print the tooltip markup for a term.
    Render { key: String },
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    definition: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let config = IdioticonConfig::from_settings(IdioticonSettings {
        theme: cli.theme.clone(),
        ..IdioticonSettings::default()
    })?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let repo = SqliteTermRepository::with_limits(&conn, config.term_limits())?;
    let store = TermStore::new(repo);

    info!("event=cli_command module=cli status=start command={:?}", cli.command);
    run(&store, &config, cli.command)
}

fn run(
    store: &TermStore<SqliteTermRepository<'_>>,
    config: &IdioticonConfig,
    command: Command,
) -> Result<()> {
    match command {
        Command::Get { key, no_resolve } => match store.get(&key, !no_resolve, true)? {
            Some(term) => print_term(&term),
            None => bail!("term not found: {key}"),
        },
        Command::Add { key, fields } => {
            let name = fields.name.unwrap_or_default();
            let definition = fields.definition.unwrap_or_default();
            match store.add(&key, &name, &definition)? {
                Some(term) => print_term(&term),
                None => println!("term `{key}` already exists; left unchanged"),
            }
        }
        Command::Set { key, fields } => {
            let term = store.set(&key, fields.name.as_deref(), fields.definition.as_deref())?;
            print_term(&term);
        }
        Command::Update { key, fields } => {
            match store.update(&key, fields.name.as_deref(), fields.definition.as_deref())? {
                Some(term) => print_term(&term),
                None => println!("term `{key}` does not exist; nothing updated"),
            }
        }
        Command::Delete { key, keep_aliases } => match store.delete(&key, !keep_aliases)? {
            Some(term) => println!("deleted `{}`", term.key),
            None => println!("term `{key}` does not exist; nothing deleted"),
        },
        Command::Alias {
            main,
            alias,
            fields,
        } => {
            let name = fields.name.unwrap_or_default();
            let definition = fields.definition.unwrap_or_default();
            let Some(target) = store.get(&main, true, true)? else {
                println!("main term `{main}` does not exist; no alias added");
                return Ok(());
            };
            let existing = store.get(&alias, false, true)?;
            let created = match existing.as_ref() {
                Some(term) => store.add_alias(&target, term, &name, &definition)?,
                None => store.add_alias(&target, &alias, &name, &definition)?,
            };
            match created {
                Some(term) => print_term(&term),
                None => println!("`{alias}` is the main term `{}`; no alias added", target.key),
            }
        }
        Command::List {
            main,
            aliases,
            search,
            limit,
        } => {
            let kind = match (main, aliases) {
                (true, _) => Some(TermKind::Main),
                (_, true) => Some(TermKind::Alias),
                _ => None,
            };
            let terms = store.list(&TermListQuery {
                kind,
                search,
                limit,
                offset: 0,
            })?;
            for term in &terms {
                let target = term
                    .main_term
                    .as_ref()
                    .map(|main| format!(" -> {}", main.key))
                    .unwrap_or_default();
                println!("{}\t{}{target}", term.key, term.get_name());
            }
        }
        Command::Render { key } => {
            println!("{}", render_term_tag(store, &key, &config.theme));
        }
    }
    Ok(())
}

fn print_term(term: &Term) {
    println!("key:        {}", term.key);
    println!("name:       {}", term.get_name());
    println!("definition: {}", term.get_definition());
    if let Some(main) = &term.main_term {
        println!("alias of:   {}", main.key);
    }
}
