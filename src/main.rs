use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sql_table_rewrite::api::{self, ApiRequest};
use sql_table_rewrite::{RewriteMapping, RewriterConfig, SqlRewriter};

#[derive(Parser)]
#[command(name = "sql-table-rewrite")]
#[command(
    author,
    version,
    about = "Rename table references in SQL without touching anything else"
)]
struct Cli {
    /// sqlparser dialect (generic, ansi, postgresql, mysql, mssql, snowflake, ...)
    #[arg(short, long, global = true, default_value = "generic")]
    dialect: String,

    /// Fallback anchor phrase for mutation targets; repeat to set the list
    /// (defaults to UPDATE, DELETE FROM, MERGE INTO)
    #[arg(long = "anchor", global = true)]
    anchors: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SqlInput {
    /// SQL text (reads stdin when neither --sql nor --file is given)
    #[arg(long, conflicts_with = "file")]
    sql: Option<String>,

    /// File containing SQL
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct MappingInput {
    /// Table mapping entry old=new; repeat for several tables
    #[arg(short, long = "map", value_name = "OLD=NEW")]
    map: Vec<String>,

    /// JSON object file of old -> new table names
    #[arg(long)]
    mapping_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables referenced by a statement
    Extract {
        #[command(flatten)]
        input: SqlInput,

        /// Also print every rewritable span
        #[arg(long)]
        tokens: bool,

        /// Print JSON instead of one name per line
        #[arg(long)]
        json: bool,
    },
    /// Rewrite table names and print the resulting SQL
    Replace {
        #[command(flatten)]
        input: SqlInput,

        #[command(flatten)]
        mapping: MappingInput,
    },
    /// Show which referenced tables a mapping would rename
    Analyze {
        #[command(flatten)]
        input: SqlInput,

        #[command(flatten)]
        mapping: MappingInput,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that SQL parses; exits non-zero when it does not
    Validate {
        #[command(flatten)]
        input: SqlInput,
    },
    /// Read an extract or replace request as JSON on stdin, write the JSON response
    ServeJson,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read stdin")?;
    Ok(buf)
}

impl SqlInput {
    fn read(&self) -> Result<String> {
        match (&self.sql, &self.file) {
            (Some(sql), _) => Ok(sql.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read SQL file: {}", path.display())),
            (None, None) => read_stdin(),
        }
    }
}

impl MappingInput {
    fn read(&self) -> Result<RewriteMapping> {
        let mut mapping = match &self.mapping_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;
                serde_json::from_str::<RewriteMapping>(&content).with_context(|| {
                    format!("Mapping file is not a JSON object: {}", path.display())
                })?
            }
            None => RewriteMapping::new(),
        };
        for (old, new) in RewriteMapping::parse_entries(&self.map)?.iter() {
            mapping.insert(old, new);
        }
        if mapping.is_empty() {
            bail!("Table mapping cannot be empty (use --map old=new or --mapping-file)");
        }
        Ok(mapping)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = RewriterConfig {
        dialect: cli.dialect.clone(),
        ..RewriterConfig::default()
    };
    if !cli.anchors.is_empty() {
        config.anchors = cli.anchors.clone();
    }
    let rewriter = SqlRewriter::from_config(&config)?;

    match cli.command {
        Commands::Extract {
            input,
            tokens,
            json,
        } => {
            let sql = input.read()?;
            let refs = rewriter.collect_references(&sql)?;
            if json {
                let value = if tokens {
                    serde_json::json!({ "tableNames": refs.tables, "tokens": refs.tokens })
                } else {
                    serde_json::json!({ "tableNames": refs.tables })
                };
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for table in refs.tables.iter() {
                    println!("{table}");
                }
                if tokens {
                    for token in &refs.tokens {
                        println!(
                            "{}..{}\t{:?}\t{}",
                            token.start,
                            token.end,
                            token.kind,
                            sql.get(token.start..token.end).unwrap_or_default()
                        );
                    }
                }
            }
        }

        Commands::Replace { input, mapping } => {
            let sql = input.read()?;
            let mapping = mapping.read()?;
            let rewritten = rewriter.replace_table_names(&sql, &mapping)?;
            print!("{rewritten}");
            if !rewritten.ends_with('\n') {
                println!();
            }
        }

        Commands::Analyze {
            input,
            mapping,
            json,
        } => {
            let sql = input.read()?;
            let mapping = mapping.read()?;
            let info = rewriter.analyze_rewrite(&sql, &mapping)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("All tables: {}", info.all_tables.join(", "));
                println!("Affected tables: {}", info.affected_tables.join(", "));
                println!("Has changes: {}", info.has_changes());
            }
        }

        Commands::Validate { input } => {
            let sql = input.read()?;
            if rewriter.validate(&sql) {
                println!("valid");
            } else {
                println!("invalid");
                std::process::exit(1);
            }
        }

        Commands::ServeJson => {
            let body = read_stdin()?;
            let request: ApiRequest =
                serde_json::from_str(&body).context("Request is not a valid JSON request body")?;
            let response = api::handle(&rewriter, &request);
            println!("{}", serde_json::to_string_pretty(&response)?);
            if !response.success() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
