//! Output formatting for framework module reports.

use crate::error::ErrorCode;
use crate::framework::{Framework, FrameworkTable};
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

/// Result of resolving a module's layout.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LayoutReport {
    Resolved { class: String },
    Failed { code: ErrorCode, message: String },
}

/// Snapshot of one framework module's configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub module: String,
    pub namespace: String,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_name: Option<String>,
    pub layout: LayoutReport,
    pub load_paths: Vec<String>,
    pub views: Vec<String>,
    pub layouts: Vec<String>,
}

impl ModuleReport {
    pub fn from_framework(framework: &Framework) -> Self {
        let config = framework.configuration();
        let layout = match config.layout() {
            Ok(layout) => LayoutReport::Resolved {
                class: layout.class_name().to_string(),
            },
            Err(err) => LayoutReport::Failed {
                code: err.code(),
                message: err.to_string(),
            },
        };

        let mut views: Vec<String> = config
            .views()
            .iter()
            .map(|v| v.class_name().to_string())
            .collect();
        views.sort();
        let mut layouts: Vec<String> = config
            .layouts()
            .iter()
            .map(|l| l.class_name().to_string())
            .collect();
        layouts.sort();

        Self {
            module: framework.name().to_string(),
            namespace: config.namespace().to_string(),
            root: config.root().display().to_string(),
            layout_name: config.layout_name().map(str::to_string),
            layout,
            load_paths: config
                .load_paths()
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            views,
            layouts,
        }
    }
}

/// Reports for every module in the table, default first.
pub fn table_report(table: &FrameworkTable) -> Vec<ModuleReport> {
    table.modules().map(ModuleReport::from_framework).collect()
}

/// Format a single module report as markdown.
pub fn format_module_markdown(report: &ModuleReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Module: {}\n", report.module));
    md.push_str(&format!("- **namespace**: `{}`\n", report.namespace));
    md.push_str(&format!("- **root**: `{}`\n", report.root));

    match (&report.layout_name, &report.layout) {
        (None, _) => md.push_str("- **layout**: none\n"),
        (Some(name), LayoutReport::Resolved { class }) => {
            md.push_str(&format!("- **layout**: {} → `{}`\n", name, class));
        }
        (Some(name), LayoutReport::Failed { message, .. }) => {
            md.push_str(&format!("- **layout**: {} (error: {})\n", name, message));
        }
    }

    if !report.load_paths.is_empty() {
        md.push_str("- **load_paths**:\n");
        for path in &report.load_paths {
            md.push_str(&format!("  - `{}`\n", path));
        }
    }
    if !report.views.is_empty() {
        md.push_str(&format!("- **views**: {}\n", report.views.join(", ")));
    }
    if !report.layouts.is_empty() {
        md.push_str(&format!("- **layouts**: {}\n", report.layouts.join(", ")));
    }

    md
}

/// Format all module reports as markdown.
pub fn format_table_markdown(reports: &[ModuleReport]) -> String {
    let mut md = format!("# Framework modules ({})\n\n", reports.len());
    for report in reports {
        md.push_str(&format_module_markdown(report));
        md.push('\n');
    }
    md
}
