use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use idef_cli::logging::redact_value;
use idef_core::{
    ErrorSummary, ImportPreview, ImportRequest, PreviewOptions, Resolution, UnmappedField,
    build_preview, required_unmapped, suggest_mapping,
};
use idef_ingest::{load_definition, load_existing, load_mapping, load_source};
use idef_model::{FieldMapping, ImportDefinition, TabularData};

use crate::cli::{CheckArgs, PreviewArgs, RequestArgs, SuggestArgs};

/// A suggested mapping and what it leaves uncovered.
pub struct Suggestion {
    pub definition: ImportDefinition,
    pub columns: Vec<String>,
    pub mapping: FieldMapping,
    pub unmapped: Vec<UnmappedField>,
}

pub struct PreviewOutcome {
    pub preview: ImportPreview,
    pub unmapped: Vec<UnmappedField>,
}

pub fn run_check(args: &CheckArgs) -> Result<ImportDefinition> {
    load_definition(&args.definition)
        .with_context(|| format!("load definition {}", args.definition.display()))
}

pub fn run_suggest(args: &SuggestArgs) -> Result<Suggestion> {
    let definition = load_definition(&args.definition)
        .with_context(|| format!("load definition {}", args.definition.display()))?;
    let data = load_data(&args.source)?;
    let mapping = suggest_mapping(&definition, &data.columns);
    let unmapped = required_unmapped(&definition, &mapping);
    info!(
        mapped = mapping.len(),
        fields = definition.fields.len(),
        "suggested mapping"
    );
    Ok(Suggestion {
        definition,
        columns: data.columns,
        mapping,
        unmapped,
    })
}

pub fn run_preview(args: &PreviewArgs) -> Result<PreviewOutcome> {
    let definition = load_definition(&args.definition)
        .with_context(|| format!("load definition {}", args.definition.display()))?;
    let span = info_span!("preview", entity = %definition.entity);
    let _guard = span.enter();

    let data = load_data(&args.source)?;
    let mapping = match &args.mapping {
        Some(path) => {
            load_mapping(path).with_context(|| format!("load mapping {}", path.display()))?
        }
        None => {
            info!("no mapping given, using suggested mapping");
            suggest_mapping(&definition, &data.columns)
        }
    };

    let unmapped = required_unmapped(&definition, &mapping);
    for field in &unmapped {
        warn!(field = %field.key, label = %field.label, "required field is not mapped");
    }

    let existing = match &args.existing {
        Some(path) => load_existing(path)
            .with_context(|| format!("load existing records {}", path.display()))?,
        None => Vec::new(),
    };

    let mut options = PreviewOptions::new();
    if let Some(threshold) = args.threshold {
        options = options.with_threshold(threshold);
    }
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let preview = build_preview(&definition, &mapping, &data, &existing, &options);
    for row in &preview.rows {
        for error in &row.processed.errors {
            let value = row.processed.normalized_value(&error.field_key);
            tracing::trace!(
                row = row.row_index,
                field = %error.field_key,
                code = %error.code,
                value = redact_value(value),
                "field error"
            );
        }
    }
    info!(
        rows = preview.summary.total_rows,
        error_rows = preview.summary.error_rows,
        "preview complete"
    );

    Ok(PreviewOutcome {
        preview,
        unmapped,
    })
}

pub fn run_request(args: &RequestArgs) -> Result<(ImportRequest, ErrorSummary)> {
    let outcome = run_preview(&args.preview)?;
    if !outcome.unmapped.is_empty() {
        let keys: Vec<&str> = outcome.unmapped.iter().map(|f| f.key.as_str()).collect();
        bail!("required fields are not mapped: {}", keys.join(", "));
    }
    let resolutions = match &args.resolutions {
        Some(path) => load_resolutions(path)?,
        None => Vec::new(),
    };
    let request = ImportRequest::build(&outcome.preview, &resolutions)
        .context("build import request")?;

    let json = serde_json::to_string_pretty(&request).context("serialize import request")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), rows = request.rows.len(), "wrote import request");
        }
        None => println!("{json}"),
    }
    Ok((request, outcome.preview.summary))
}

fn load_data(path: &Path) -> Result<TabularData> {
    let data = load_source(path).with_context(|| format!("load source {}", path.display()))?;
    if data.columns.is_empty() {
        bail!("no columns found in {}", path.display());
    }
    if data.is_empty() {
        bail!("no data rows found in {}", path.display());
    }
    Ok(data)
}

fn load_resolutions(path: &Path) -> Result<Vec<Resolution>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read resolutions {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse resolutions {}", path.display()))
}
