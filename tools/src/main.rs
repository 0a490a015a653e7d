//! verify-runner: headless runner for the carbon verification engine.
//!
//! Usage:
//!   verify-runner --inputs project.json [--json] [--save --db models.db]
//!   verify-runner --defaults reforestation
//!   verify-runner --ipc-mode --db models.db

use anyhow::{Context, Result};
use carbon_verify_core::{
    config::EngineConfig,
    engine::FinancialEngine,
    inputs::{ProjectType, VerificationInputs},
    model::VerificationFinancialModel,
    store::ModelStore,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Instant;

const DEMO_USER: &str = "demo-user-1";

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Calculate {
        inputs: VerificationInputs,
    },
    Defaults {
        project_type: String,
    },
    Save {
        model: Box<VerificationFinancialModel>,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    },
    Load {
        model_id: String,
    },
    List {
        #[serde(default)]
        user_id: Option<String>,
    },
    Quit,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculationMetadata {
    calculation_time_ms: u128,
    monthly_projections: usize,
    recommended_frequency: String,
    total_project_value: f64,
    roi: String,
    payback_months: usize,
    climate_risk_score: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let print_json = args.iter().any(|a| a == "--json");
    let save = args.iter().any(|a| a == "--save");
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");

    let config = if Path::new(data_dir).is_dir() {
        EngineConfig::load(data_dir)?
    } else {
        log::warn!("Config directory {data_dir} not found; using built-in config");
        EngineConfig::builtin()
    };
    let engine = FinancialEngine::new(config)?;

    let store = ModelStore::open(db)?;
    store.migrate()?;

    if ipc_mode {
        return run_ipc_loop(&engine, &store);
    }

    if let Some(project_type) = arg_value(&args, "--defaults") {
        let project_type: ProjectType = project_type.parse()?;
        let defaults = engine.config().defaults_for(project_type);
        println!("{}", serde_json::to_string_pretty(&defaults)?);
        return Ok(());
    }

    let inputs_path = arg_value(&args, "--inputs")
        .context("missing --inputs <file.json> (or use --defaults / --ipc-mode)")?;
    let content = std::fs::read_to_string(inputs_path)
        .with_context(|| format!("Cannot read {inputs_path}"))?;
    let inputs: VerificationInputs = serde_json::from_str(&content)?;
    let inputs = inputs.validated()?;

    let model = engine.calculate(&inputs)?;

    if print_json {
        println!("{}", serde_json::to_string_pretty(&model)?);
    } else {
        print_summary(&model);
    }

    if save {
        let model_id = store.save_model(&model, DEMO_USER, None, &[])?;
        println!();
        println!("  saved as:       {model_id} ({db})");
    }

    Ok(())
}

fn run_ipc_loop(engine: &FinancialEngine, store: &ModelStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unrecognized IPC command: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }

        match handle_command(engine, store, cmd) {
            Ok(reply) => writeln!(stdout, "{}", reply)?,
            Err(e) => {
                log::warn!("IPC command failed: {e:#}");
                write_error(&mut stdout, &format!("{e:#}"))?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    engine: &FinancialEngine,
    store: &ModelStore,
    cmd: IpcCommand,
) -> Result<serde_json::Value> {
    let reply = match cmd {
        IpcCommand::Calculate { inputs } => {
            let started = Instant::now();
            let inputs = inputs.validated()?;
            let model = engine.calculate(&inputs)?;
            let metadata = CalculationMetadata {
                calculation_time_ms: started.elapsed().as_millis(),
                monthly_projections: model.monthly_projections.len(),
                recommended_frequency: model.comparison.recommended_frequency.to_string(),
                total_project_value: model.total_project_revenue,
                roi: format!("{:.2}%", model.project_roi * 100.0),
                payback_months: model.payback_period,
                climate_risk_score: model.climate_risk_score,
            };
            serde_json::json!({ "success": true, "data": model, "metadata": metadata })
        }
        IpcCommand::Defaults { project_type } => {
            let project_type: ProjectType = project_type.parse()?;
            let defaults = engine.config().defaults_for(project_type);
            serde_json::json!({ "success": true, "data": defaults })
        }
        IpcCommand::Save { model, user_id, description, tags } => {
            let user_id = user_id.as_deref().unwrap_or(DEMO_USER);
            let model_id = store.save_model(&model, user_id, description.as_deref(), &tags)?;
            serde_json::json!({
                "success": true,
                "data": {
                    "modelId": model_id,
                    "projectName": model.inputs.project_name,
                },
            })
        }
        IpcCommand::Load { model_id } => {
            let model = store.require_model(&model_id)?;
            serde_json::json!({ "success": true, "data": model })
        }
        IpcCommand::List { user_id } => {
            let models = store.list_models(user_id.as_deref().unwrap_or(DEMO_USER))?;
            serde_json::json!({ "success": true, "data": models })
        }
        IpcCommand::Quit => serde_json::json!({ "success": true }),
    };
    Ok(reply)
}

fn write_error(stdout: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(model: &VerificationFinancialModel) {
    let inputs = &model.inputs;
    println!("=== VERIFICATION MODEL ===");
    println!("  project:        {} ({})", inputs.project_name, inputs.project_type);
    println!("  start:          {}", inputs.project_start_date);
    println!("  duration:       {} years", inputs.project_duration);
    println!("  frequency:      {}", inputs.verification_frequency);
    println!("  months:         {}", model.monthly_projections.len());
    println!("  revenue:        {:.0}", model.total_project_revenue);
    println!("  costs:          {:.0}", model.total_project_costs);
    println!("  ROI:            {:.2}%", model.project_roi * 100.0);
    if model.payback_saturated() {
        println!("  payback:        not reached within {} months", model.payback_period);
    } else {
        println!("  payback:        month {}", model.payback_period + 1);
    }
    println!("  NPV:            {:.0}", model.npv);
    println!("  climate risk:   {:.2}", model.climate_risk_score);

    println!();
    println!("=== CADENCE COMPARISON ===");
    for scenario in model.comparison.scenarios.values() {
        let marker = if scenario.frequency == model.comparison.recommended_frequency {
            " *"
        } else {
            ""
        };
        println!(
            "  {:<12} | Financing: {:.0} | Avg WC: {:.0} | Peak WC: {:.0} | NPV: {:.0}{marker}",
            scenario.frequency.as_str(),
            scenario.financing_cost_total,
            scenario.avg_working_capital,
            scenario.max_working_capital,
            scenario.npv
        );
    }

    if !model.comparison.key_insights.is_empty() {
        println!();
        println!("=== INSIGHTS ===");
        for insight in &model.comparison.key_insights {
            println!("  - {insight}");
        }
    }
    if !model.comparison.risk_factors.is_empty() {
        println!();
        println!("=== RISK FACTORS ===");
        for risk in &model.comparison.risk_factors {
            println!("  - {risk}");
        }
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
