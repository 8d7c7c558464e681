//! Subcommand implementations
//!
//! Each command writes its user-facing output to the given writer and
//! returns the process exit code.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ArgMatches;
use homeroom_core::config::DEFAULT_CONFIG_FILE;
use homeroom_core::credential::API_KEY_NAME;
use homeroom_core::report::build_rows;
use homeroom_core::{
    BatchRunner, CommentGenerator, CompletionBackend, CredentialChain, HomeroomConfig,
    SelectionState, Taxonomy,
};
use homeroom_export::export_to_path;
use homeroom_gemini::{GeminiBackend, GeminiConfig};
use serde_json::json;
use tracing::{info, warn};

use crate::prompt::TerminalPrompt;
use crate::selection::{parse_select, SelectionFile, SessionInput};

/// Command finished
pub const EXIT_OK: u8 = 0;

/// Generation refused: no credential or nothing selected
pub const EXIT_REFUSED: u8 = 2;

/// Run the subcommand in `matches`.
///
/// # Errors
/// Any failure reading inputs, building the backend or writing output.
pub async fn dispatch<W: Write>(matches: &ArgMatches, out: &mut W) -> anyhow::Result<u8> {
    match matches.subcommand() {
        Some(("taxonomy", args)) => {
            taxonomy(args.get_flag("json"), out)?;
            Ok(EXIT_OK)
        }
        Some(("generate", args)) => generate(args, out).await,
        Some(("export", args)) => export(args, out),
        Some((other, _)) => anyhow::bail!("unknown command '{other}'"),
        None => anyhow::bail!("no command given"),
    }
}

/// Print the taxonomy, as text or JSON.
///
/// # Errors
/// Write failures.
pub fn taxonomy<W: Write>(as_json: bool, out: &mut W) -> anyhow::Result<()> {
    let taxonomy = Taxonomy::global();
    if as_json {
        let categories: Vec<_> = taxonomy
            .categories()
            .map(|(name, keywords)| json!({"category": name, "keywords": keywords}))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &categories)?;
        writeln!(out)?;
        return Ok(());
    }

    for (name, keywords) in taxonomy.categories() {
        writeln!(out, "{name} ({})", keywords.len())?;
        writeln!(out, "  {}", keywords.join(", "))?;
    }
    Ok(())
}

fn load_config(args: &ArgMatches) -> anyhow::Result<HomeroomConfig> {
    let path = args
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    HomeroomConfig::load(&path).with_context(|| format!("loading configuration from {}", path.display()))
}

fn load_session(args: &ArgMatches, config: &HomeroomConfig) -> anyhow::Result<SelectionState> {
    let file = args
        .get_one::<PathBuf>("input")
        .map(|path| SelectionFile::load(path))
        .transpose()?;
    let selects = args
        .get_many::<String>("select")
        .into_iter()
        .flatten()
        .map(|value| parse_select(value))
        .collect::<Result<Vec<_>, _>>()?;

    let input = SessionInput {
        students: args.get_one::<usize>("students").copied(),
        file,
        selects,
    };
    Ok(input.into_session(config.default_students)?)
}

fn output_path(args: &ArgMatches, config: &HomeroomConfig) -> PathBuf {
    args.get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| config.output_path.clone())
}

fn export<W: Write>(args: &ArgMatches, out: &mut W) -> anyhow::Result<u8> {
    let config = load_config(args)?;
    let session = load_session(args, &config)?;
    let output = output_path(args, &config);
    write_report(&session, &output, out)?;
    Ok(EXIT_OK)
}

async fn generate<W: Write>(args: &ArgMatches, out: &mut W) -> anyhow::Result<u8> {
    let config = load_config(args)?;
    let session = load_session(args, &config)?;
    let output = output_path(args, &config);

    let secrets = args
        .get_one::<PathBuf>("secrets")
        .cloned()
        .unwrap_or_else(|| config.secrets_path.clone());
    let api_key = {
        let mut chain = CredentialChain::standard(&secrets);
        if !args.get_flag("no-prompt") {
            chain = chain.with_source(TerminalPrompt::detect());
        }
        chain
            .resolve()
            .map(|credential| {
                info!(source = credential.source(), "using API key");
                credential.expose().to_string()
            })
            .unwrap_or_default()
    };
    if api_key.is_empty() {
        writeln!(
            out,
            "No API key found. Set {API_KEY_NAME} or add it to {}.",
            secrets.display()
        )?;
        return Ok(EXIT_REFUSED);
    }

    let backend = GeminiBackend::new(GeminiConfig::from(&config)).context("building HTTP client")?;
    let generator = CommentGenerator::new(backend)
        .with_model(config.model.clone())
        .with_template(config.prompt_template());
    generate_with(generator, session, &api_key, &output, out).await
}

/// Generate comments for every selected student, print them and write the
/// report to `output`.
///
/// Returns [`EXIT_REFUSED`] without calling the backend when the key is
/// empty or no student has keywords.
///
/// # Errors
/// Write failures, including writing the report.
pub async fn generate_with<B, W>(
    generator: CommentGenerator<B>,
    mut session: SelectionState,
    api_key: &str,
    output: &Path,
    out: &mut W,
) -> anyhow::Result<u8>
where
    B: CompletionBackend,
    W: Write,
{
    let runner = BatchRunner::new(generator);
    let outcome = runner
        .run(&mut session, api_key, |progress| {
            let status = if progress.succeeded { "ok" } else { "failed" };
            if let Err(e) = writeln!(
                out,
                "[{}/{}] {} {status}",
                progress.processed, progress.total, progress.label
            ) {
                warn!(error = %e, label = %progress.label, "could not write progress line");
            }
        })
        .await;

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            writeln!(out, "Cannot generate comments: {err}")?;
            return Ok(EXIT_REFUSED);
        }
    };

    writeln!(out)?;
    for row in build_rows(&session) {
        writeln!(out, "{}: {}", row.label, row.comment)?;
    }
    writeln!(
        out,
        "\n{}/{} comments generated in {} ms",
        report.succeeded, report.total, report.elapsed_ms
    )?;

    write_report(&session, output, out)?;
    Ok(EXIT_OK)
}

fn write_report<W: Write>(session: &SelectionState, output: &Path, out: &mut W) -> anyhow::Result<()> {
    let rows = build_rows(session);
    let written = export_to_path(&rows, output)
        .with_context(|| format!("writing report to {}", output.display()))?;
    if written {
        writeln!(out, "Report written to {} ({} rows)", output.display(), rows.len())?;
    } else {
        writeln!(out, "Nothing to export: no student has keywords or a comment.")?;
    }
    Ok(())
}
