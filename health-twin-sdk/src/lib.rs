// Re-export the derive macro
pub use health_twin_macros::WorkflowDefinition;

use serde::{Deserialize, Serialize};

/// Page metadata (id, name, description)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Complete page metadata with its input fields (for JSON export)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullWorkflowMetadata {
    #[serde(flatten)]
    pub metadata: WorkflowMetadata,
    pub fields: Vec<FieldSchema>,
}

/// One form field of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    pub label: String,
    pub description: String,
    pub cli_arg: String,
    pub required: bool,
    pub default: Option<String>,
}

/// Form widget kinds a page can ask for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    FilePath {
        #[serde(skip_serializing_if = "Option::is_none")]
        pattern: Option<String>,
    },
    Select {
        options: Vec<String>,
    },
    MultiSelect {
        options: Vec<String>,
    },
}

/// Implemented by `#[derive(WorkflowDefinition)]` on a page's argument struct
pub trait WorkflowDefinition {
    fn metadata() -> WorkflowMetadata;
    fn fields() -> Vec<FieldSchema>;

    fn full_metadata() -> FullWorkflowMetadata {
        FullWorkflowMetadata {
            metadata: Self::metadata(),
            fields: Self::fields(),
        }
    }

    /// Print the page's metadata and field schema as pretty JSON on stdout
    fn print_metadata(&self) {
        match serde_json::to_string_pretty(&Self::full_metadata()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize page metadata: {}", e),
        }
    }
}

/// Prefix marking structured event lines on stderr
pub const EVENT_PREFIX: &str = "__HT_EVENT__:";

/// Structured progress events emitted while a pipeline runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowLog {
    RunStarted {
        run_id: String,
        page: String,
        total_stages: usize,
    },
    RunCompleted {
        run_id: String,
        page: String,
    },
    StageStarted {
        run_id: String,
        stage: usize,
        name: String,
    },
    StageCompleted {
        run_id: String,
        stage: usize,
        name: String,
    },
    StageFailed {
        run_id: String,
        stage: usize,
        name: String,
        error: String,
    },
    AgentStarted {
        run_id: String,
        agent: String,
        description: String,
    },
    AgentCompleted {
        run_id: String,
        agent: String,
        output_chars: usize,
    },
    AgentFailed {
        run_id: String,
        agent: String,
        error: String,
    },
    /// Report artifact written for download
    ReportExported {
        run_id: String,
        path: String,
        mime: String,
    },
}

impl WorkflowLog {
    /// Render the event as a single prefixed line
    pub fn to_line(&self) -> Option<String> {
        serde_json::to_string(self)
            .ok()
            .map(|json| format!("{}{}", EVENT_PREFIX, json))
    }

    /// Parse a line produced by [`WorkflowLog::to_line`]
    pub fn parse_line(line: &str) -> Option<Self> {
        let json = line.strip_prefix(EVENT_PREFIX)?;
        serde_json::from_str(json).ok()
    }

    /// Emit this event on stderr
    pub fn emit(&self) {
        if let Some(line) = self.to_line() {
            use std::io::Write;
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

#[macro_export]
macro_rules! log_run_start {
    ($run_id:expr, $page:expr, $total:expr) => {
        $crate::WorkflowLog::RunStarted {
            run_id: $run_id.to_string(),
            page: $page.to_string(),
            total_stages: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_run_complete {
    ($run_id:expr, $page:expr) => {
        $crate::WorkflowLog::RunCompleted {
            run_id: $run_id.to_string(),
            page: $page.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_start {
    ($run_id:expr, $stage:expr, $name:expr) => {
        $crate::WorkflowLog::StageStarted {
            run_id: $run_id.to_string(),
            stage: $stage,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_complete {
    ($run_id:expr, $stage:expr, $name:expr) => {
        $crate::WorkflowLog::StageCompleted {
            run_id: $run_id.to_string(),
            stage: $stage,
            name: $name.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_failed {
    ($run_id:expr, $stage:expr, $name:expr, $error:expr) => {
        $crate::WorkflowLog::StageFailed {
            run_id: $run_id.to_string(),
            stage: $stage,
            name: $name.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_start {
    ($run_id:expr, $agent:expr, $desc:expr) => {
        $crate::WorkflowLog::AgentStarted {
            run_id: $run_id.to_string(),
            agent: $agent.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_complete {
    ($run_id:expr, $agent:expr, $chars:expr) => {
        $crate::WorkflowLog::AgentCompleted {
            run_id: $run_id.to_string(),
            agent: $agent.to_string(),
            output_chars: $chars,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_agent_failed {
    ($run_id:expr, $agent:expr, $error:expr) => {
        $crate::WorkflowLog::AgentFailed {
            run_id: $run_id.to_string(),
            agent: $agent.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_report_exported {
    ($run_id:expr, $path:expr, $mime:expr) => {
        $crate::WorkflowLog::ReportExported {
            run_id: $run_id.to_string(),
            path: $path.to_string(),
            mime: $mime.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Human-readable output for the command line, next to the structured
// WorkflowLog events above.
// ============================================================================

/// Logs a page header.
///
/// # Example
/// ```
/// use health_twin_sdk::log_page_header;
/// log_page_header!("AI Health Twin - Future Health Risk Assessment");
/// ```
#[macro_export]
macro_rules! log_page_header {
    ($title:expr) => {
        println!("\x1b[1;36m═══ {} ═══\x1b[0m", $title);
    };
}

/// Logs an informational message.
///
/// # Example
/// ```
/// use health_twin_sdk::log_info;
/// log_info!("Loading health data from {}", "survey.json");
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use health_twin_sdk::log_warning;
/// log_warning!("Report could not be saved");
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use health_twin_sdk::log_file_saved;
/// log_file_saved!("./reports/health_report.md");
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}
