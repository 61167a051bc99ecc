//! Command line interface: one subcommand per page

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use health_twin_sdk::{log_file_saved, log_info, log_page_header, log_warning, WorkflowDefinition};

use crate::agent::{AgentRoster, OpenAiExecutor};
use crate::config::Settings;
use crate::error::{HealthTwinError, Result};
use crate::navigation::render_sidebar;
use crate::pages::educator::EducatorArgs;
use crate::pages::health_analysis::HealthAnalysisArgs;
use crate::pages::nurse::NurseArgs;
use crate::pages::risk_assessment::RiskAssessmentArgs;
use crate::pages::survey::SurveyArgs;
use crate::pages::therapist::TherapistArgs;
use crate::pages::{self, Page, PageContext, PageOutcome};
use crate::pipeline::HandoffMode;
use crate::report::FileReportSink;

#[derive(Parser, Debug)]
#[command(
    name = "health-twin",
    version,
    about = "AI Health Twin - Your Digital Health Companion"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every page
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Chat model to use (overrides OPENAI_MODEL_NAME)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Seconds each stage may take, 0 for no limit
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Directory for exported reports
    #[arg(long, global = true)]
    pub report_dir: Option<PathBuf>,

    /// Pass earlier stage answers on to later stages
    #[arg(long, global = true, value_enum)]
    pub handoff: Option<HandoffMode>,

    /// YAML file overriding agent role, goal and backstory
    #[arg(long, global = true)]
    pub agents: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the home page and navigation
    Pages,
    /// Analyze an uploaded health data file and get a lifestyle plan
    Analyze(HealthAnalysisArgs),
    /// Predict future health risks and get preventive care advice
    Risk(RiskAssessmentArgs),
    /// Ask the health educator a question
    Educator(EducatorArgs),
    /// Talk to the AI therapist
    Therapist(TherapistArgs),
    /// Get symptom insights and a medication reminder
    Nurse(NurseArgs),
    /// Fill out the health survey and export it as JSON
    Survey(SurveyArgs),
}

impl Command {
    pub fn page(&self) -> Page {
        match self {
            Command::Pages => Page::Home,
            Command::Analyze(_) => Page::HealthAnalysis,
            Command::Risk(_) => Page::RiskAssessment,
            Command::Educator(_) => Page::Educator,
            Command::Therapist(_) => Page::Therapist,
            Command::Nurse(_) => Page::Nurse,
            Command::Survey(_) => Page::Survey,
        }
    }

    /// Print page metadata instead of running, when `--workflow-metadata` was given
    fn print_metadata_requested(&self) -> bool {
        match self {
            Command::Pages => false,
            Command::Analyze(args) => print_if(args.workflow_metadata, args),
            Command::Risk(args) => print_if(args.workflow_metadata, args),
            Command::Educator(args) => print_if(args.workflow_metadata, args),
            Command::Therapist(args) => print_if(args.workflow_metadata, args),
            Command::Nurse(args) => print_if(args.workflow_metadata, args),
            Command::Survey(args) => print_if(args.workflow_metadata, args),
        }
    }

    fn needs_agents(&self) -> bool {
        !matches!(self, Command::Pages | Command::Survey(_))
    }
}

fn print_if<T: WorkflowDefinition>(requested: bool, args: &T) -> bool {
    if requested {
        args.print_metadata();
    }
    requested
}

impl Cli {
    /// Run the selected page and print its result; errors end up as a user message
    pub async fn run(self) -> ExitCode {
        if self.command.print_metadata_requested() {
            return ExitCode::SUCCESS;
        }

        match self.dispatch().await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                eprintln!("{}", e.user_message());
                if e.is_recoverable() {
                    ExitCode::from(2)
                } else {
                    ExitCode::FAILURE
                }
            }
        }
    }

    async fn dispatch(self) -> Result<()> {
        let page = self.command.page();
        log_page_header!(page.title());
        println!("{}", page_preamble(page));

        if let Command::Pages = self.command {
            return Ok(());
        }

        let settings = Settings::from_env()?.merge_args(&self.global);
        tracing::debug!(
            model = %settings.model,
            stage_timeout = ?settings.stage_timeout,
            handoff = ?settings.handoff,
            "Settings loaded"
        );

        let roster = match &settings.agents_file {
            Some(path) => AgentRoster::load(path)
                .await
                .map_err(|e| HealthTwinError::Config(format!("{:#}", e)))?,
            None => AgentRoster::default(),
        };
        let sink = FileReportSink::new(&settings.report_dir);
        let ctx = PageContext {
            sink: &sink,
            roster: &roster,
            handoff: settings.handoff,
            stage_timeout: settings.stage_timeout,
        };

        let executor = if self.command.needs_agents() {
            let config = settings.openai_config()?;
            log_info!("Using model {}", config.model);
            Some(OpenAiExecutor::new(config))
        } else {
            None
        };

        let outcome = match (&self.command, executor.as_ref()) {
            (Command::Survey(args), _) => pages::survey::run(args, &ctx).await?,
            (Command::Analyze(args), Some(executor)) => {
                pages::health_analysis::run(args, &ctx, executor).await?
            }
            (Command::Risk(args), Some(executor)) => {
                pages::risk_assessment::run(args, &ctx, executor).await?
            }
            (Command::Educator(args), Some(executor)) => {
                pages::educator::run(args, &ctx, executor).await?
            }
            (Command::Therapist(args), Some(executor)) => {
                pages::therapist::run(args, &ctx, executor).await?
            }
            (Command::Nurse(args), Some(executor)) => pages::nurse::run(args, &ctx, executor).await?,
            _ => return Err(HealthTwinError::Config("no agent engine configured".to_string())),
        };

        print_outcome(&outcome);
        Ok(())
    }
}

/// Page intro followed by the shared sidebar, shown before every page runs
fn page_preamble(page: Page) -> String {
    format!("{}\n\n{}\n", page.intro(), render_sidebar(page))
}

fn print_outcome(outcome: &PageOutcome) {
    println!("{}\n", outcome.page.result_heading());
    println!("{}", outcome.text);

    if let Some(report) = &outcome.report {
        log_file_saved!(report.path.display());
        log_info!("{} ({})", report.file_name, report.mime);
    }
    if let Some(e) = &outcome.export_error {
        log_warning!(e.user_message());
    }
}
