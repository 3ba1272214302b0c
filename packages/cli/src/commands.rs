//! Subcommand implementations.

use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use dc_receiving_cli_utils::{MultiProgress, prompt_quantity, spinner};
use dc_receiving_manifest::config::ExtractionConfig;
use dc_receiving_manifest::{ConfigError, DEBUG_EXCERPT_CHARS, Extractor, ManifestExtraction};
use dc_receiving_manifest_models::HeaderField;
use dc_receiving_receiving::{ReceivingSession, parse_received_csv};
use dc_receiving_report::json::{ExtractionDump, write_dump};
use dc_receiving_report::{csv_export, format_optional_quantity, format_quantity, table, worksheet};

/// Which extraction config to run with.
pub struct ProfileArgs {
    /// Built-in profile id.
    pub id: String,
    /// Config file that takes precedence over the profile.
    pub config: Option<PathBuf>,
}

impl ProfileArgs {
    /// Builds the extractor this selection names.
    pub fn extractor(&self) -> Result<Extractor, ConfigError> {
        match &self.config {
            Some(path) => Extractor::new(ExtractionConfig::from_path(path)?),
            None => Extractor::from_profile(&self.id),
        }
    }
}

/// Reads and extracts `file`, showing a spinner meanwhile.
fn load(
    multi: &MultiProgress,
    profile: &ProfileArgs,
    file: &Path,
) -> Result<(Extractor, ManifestExtraction), Box<dyn std::error::Error>> {
    let extractor = profile.extractor()?;

    let bar = spinner(multi, &format!("Reading {}...", file.display()));
    let text = match dc_receiving_pdf::read_manifest_text(file) {
        Ok(text) => text,
        Err(e) => {
            bar.finish_and_clear();
            return Err(e.into());
        }
    };

    bar.set_message("Extracting packages...");
    let extraction = extractor.extract(&text);
    bar.finish_with_message(format!(
        "Found {} packages in {}",
        extraction.packages.len(),
        file.display()
    ));

    Ok((extractor, extraction))
}

/// Warns about an empty extraction and shows the start of the text.
///
/// Returns `true` if there were no packages.
fn report_if_empty(extraction: &ManifestExtraction) -> bool {
    if !extraction.is_empty() {
        return false;
    }

    log::warn!("No packages found in manifest");
    println!();
    println!("No packages found. First {DEBUG_EXCERPT_CHARS} characters of the text:");
    println!("{}", "-".repeat(60));
    println!("{}", extraction.debug_excerpt(DEBUG_EXCERPT_CHARS));
    println!("{}", "-".repeat(60));
    true
}

fn print_header(extraction: &ManifestExtraction) {
    println!();
    for field in HeaderField::ALL {
        println!(
            "{:<20} {}",
            format!("{}:", field.label()),
            extraction.header.get(*field).unwrap_or("Not found")
        );
    }
    println!();
}

fn create_output(path: &Path) -> std::io::Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Output path, or the default file name in the current directory.
fn output_path(output: Option<&Path>, default_name: String) -> PathBuf {
    output.map_or_else(|| PathBuf::from(default_name), Path::to_path_buf)
}

/// `extract`: print header, package table, and statistics.
pub fn extract(
    multi: &MultiProgress,
    profile: &ProfileArgs,
    file: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (extractor, extraction) = load(multi, profile, file)?;

    if json {
        let dump = ExtractionDump::new(&extractor.config().id, &extraction);
        write_dump(std::io::stdout().lock(), &dump)?;
        return Ok(());
    }

    print_header(&extraction);
    if report_if_empty(&extraction) {
        return Ok(());
    }

    print!("{}", table::render(&extraction.rows()));

    let stats = extraction.stats();
    let summary = extraction.summary();
    println!();
    println!("Total packages:         {}", summary.total_packages);
    println!(
        "Total quantity shipped: {} ea",
        format_quantity(summary.total_quantity_shipped)
    );
    println!("With package ID:        {}", stats.with_identifier);
    println!("With item name:         {}", stats.with_item_name);
    println!("With qty shipped:       {}", stats.with_quantity_shipped);
    println!("With production batch:  {}", stats.with_production_batch);

    Ok(())
}

/// `csv`: write the package list CSV.
pub fn csv(
    multi: &MultiProgress,
    profile: &ProfileArgs,
    file: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, extraction) = load(multi, profile, file)?;
    if report_if_empty(&extraction) {
        return Ok(());
    }

    let path = output_path(
        output,
        dc_receiving_report::packages_file_name(&extraction.header),
    );
    csv_export::write_packages(create_output(&path)?, &extraction.rows())?;

    log::info!("Wrote {} packages to {}", extraction.packages.len(), path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

/// `worksheet`: write the printable verification worksheet.
pub fn worksheet(
    multi: &MultiProgress,
    profile: &ProfileArgs,
    file: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, extraction) = load(multi, profile, file)?;
    if report_if_empty(&extraction) {
        return Ok(());
    }

    let sheet = worksheet::render(
        &extraction.header,
        &extraction.packages,
        chrono::Local::now().date_naive(),
    );
    let path = output_path(
        output,
        dc_receiving_report::worksheet_file_name(&extraction.header),
    );
    let mut writer = create_output(&path)?;
    writer.write_all(sheet.as_bytes())?;
    writer.flush()?;

    println!("Wrote {}", path.display());
    Ok(())
}

/// Asks for every package's received quantity, defaulting to shipped.
fn prompt_received(
    multi: &MultiProgress,
    session: &mut ReceivingSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let prompts: Vec<(u32, String, String)> = session
        .entries()
        .iter()
        .map(|e| {
            let name = e.record.item_name.as_deref().unwrap_or("(no item name)");
            let prompt = format!(
                "#{} {name} (shipped {})",
                e.record.sequence,
                format_optional_quantity(e.record.quantity_shipped)
            );
            (e.record.sequence, prompt, format_quantity(e.received))
        })
        .collect();

    for (sequence, prompt, default) in prompts {
        let qty = multi.suspend(|| prompt_quantity(&prompt, &default))?;
        session.set_received(sequence, qty)?;
    }
    Ok(())
}

/// `receive`: record received quantities and write the receiving report.
pub fn receive(
    multi: &MultiProgress,
    profile: &ProfileArgs,
    file: &Path,
    received: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, extraction) = load(multi, profile, file)?;
    if report_if_empty(&extraction) {
        return Ok(());
    }

    let mut session = ReceivingSession::from_packages(&extraction.packages);
    match received {
        Some(path) => session.apply(&parse_received_csv(File::open(path)?)?)?,
        None => prompt_received(multi, &mut session)?,
    }

    let path = output_path(
        output,
        dc_receiving_report::receiving_report_file_name(&extraction.header),
    );
    csv_export::write_receiving(create_output(&path)?, &session.rows())?;

    let totals = session.totals();
    println!();
    println!("Total shipped:  {} ea", format_quantity(totals.total_shipped));
    println!("Total received: {} ea", format_quantity(totals.total_received));
    println!("Total variance: {} ea", format_quantity(totals.total_variance));

    let discrepancies: Vec<_> = session.discrepancies().collect();
    if !discrepancies.is_empty() {
        println!();
        println!("Discrepancies:");
        for entry in discrepancies {
            println!(
                "  #{:<4} {:<40} shipped {:>8}  received {:>8}",
                entry.record.sequence,
                entry.record.item_name.as_deref().unwrap_or(""),
                format_optional_quantity(entry.record.quantity_shipped),
                format_quantity(entry.received)
            );
        }
    }

    println!();
    println!("Wrote {}", path.display());
    Ok(())
}

/// `profiles`: list built-in extraction profiles.
pub fn profiles() {
    let profiles = dc_receiving_manifest::profiles::builtin_profiles();
    println!("{:<24} {:<16} NAME", "ID", "STRATEGY");
    println!("{}", "-".repeat(80));
    for profile in &profiles {
        println!(
            "{:<24} {:<16} {}",
            profile.id,
            profile.segmentation.label(),
            profile.name
        );
    }
}
