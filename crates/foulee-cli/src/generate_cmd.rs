//! `foulee validate` and `foulee generate`.

use std::io::Write;

use anyhow::Context;

use foulee_core::export::{self, ExportFormat};
use foulee_core::{FieldErrors, NormalizedProfile, RawProfileInput, generate_plan, validate};

/// Print one line per invalid field to stderr and turn the errors into an
/// `anyhow` failure so the process exits non-zero.
fn report_invalid(errors: FieldErrors) -> anyhow::Error {
    for (field, message) in errors.iter() {
        eprintln!("  {:<10} {message}", format!("{field}:"));
    }
    anyhow::anyhow!("profile has {} invalid field(s)", errors.len())
}

/// Validate only, reporting the normalized profile.
pub fn run_validate(raw: &RawProfileInput) -> anyhow::Result<()> {
    let profile = validate(raw).map_err(report_invalid)?;
    print_profile(&mut std::io::stdout().lock(), &profile)?;
    Ok(())
}

fn print_profile(out: &mut dyn Write, profile: &NormalizedProfile) -> std::io::Result<()> {
    writeln!(out, "Profile OK")?;
    writeln!(out, "  sex:       {}", profile.sex().label())?;
    writeln!(out, "  age:       {} ans", profile.age_years())?;
    writeln!(out, "  height:    {} cm", profile.height_cm())?;
    writeln!(out, "  weight:    {} kg", profile.weight_kg())?;
    writeln!(out, "  goal time: {}", profile.goal_time())?;
    writeln!(out, "  BMI:       {:.1}", profile.body_mass_index())?;
    Ok(())
}

/// Validate, generate, and write the plan in `format`.
///
/// The output file is only opened once the plan has rendered, so a rejected
/// profile leaves an existing file untouched.
pub fn run_generate(
    raw: &RawProfileInput,
    format: ExportFormat,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let (rendered, weeks) = render_plan(raw, format)?;

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {path}"))?,
        )
    } else {
        Box::new(std::io::stdout().lock())
    };

    writer.write_all(rendered.as_bytes())?;
    writer.flush()?;

    if let Some(path) = output {
        println!("Exported {weeks}-week plan ({format}) to {path}");
    }
    Ok(())
}

/// Generate and render, returning the document and its number of weeks.
fn render_plan(raw: &RawProfileInput, format: ExportFormat) -> anyhow::Result<(String, usize)> {
    let profile = validate(raw).map_err(report_invalid)?;
    let plan = generate_plan(&profile);
    let rendered = export::render(&plan, Some(&profile), format)
        .with_context(|| format!("failed to render plan as {format}"))?;
    Ok((rendered, plan.len()))
}
