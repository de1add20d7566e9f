mod config;
mod errors;
mod judge;
mod lang;
mod report;
mod sandbox;
mod scrub;
mod store;
mod workspace;


use anyhow::Context;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use arbiter_common::types::{JudgeMode, JudgeRequest, RunRequest, RunResponse};
use config::EngineConfig;
use store::FsStore;

/// One-shot driver: read a JSON request from the path given as the first
/// argument (or stdin when absent), execute it, and print the JSON result.
/// A payload carrying a `problem` descriptor is judged against the test
/// case store; anything else is a single-shot run. Execution failures are
/// payload, not process errors, so the exit code stays zero for them.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Arbiter judge booting...");

    let config = EngineConfig::from_env().map_err(|e| {
        error!("Invalid engine configuration: {}", e);
        e
    })?;

    info!(
        workspace_root = %config.workspace_root.display(),
        hard_timeout_ms = config.hard_timeout_ms,
        default_time_limit_ms = config.default_time_limit_ms,
        "Engine configured"
    );

    let payload = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read request file {}", path))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read request from stdin")?;
            buf
        }
    };

    // A judge request is distinguished by its `problem` descriptor; plain
    // run payloads do not parse as one.
    let output = if let Ok(request) = serde_json::from_str::<JudgeRequest>(&payload) {
        handle_judge(&config, request).await?
    } else {
        let request: RunRequest =
            serde_json::from_str(&payload).context("invalid request payload")?;
        handle_run(&config, request).await?
    };

    println!("{}", output);
    Ok(())
}

async fn handle_run(config: &EngineConfig, request: RunRequest) -> anyhow::Result<String> {
    info!(
        language = %request.language,
        source_size = request.code.len(),
        input_size = request.input.len(),
        "Received run request"
    );

    let response = judge::execute_run(config, &request).await;

    if response.success {
        info!(
            execution_time_ms = response.execution_time_ms,
            "Run completed"
        );
    } else {
        warn!(error = response.error.as_deref().unwrap_or(""), "Run failed");
    }

    Ok(serde_json::to_string(&response)?)
}

async fn handle_judge(config: &EngineConfig, request: JudgeRequest) -> anyhow::Result<String> {
    let store_root =
        std::env::var("ARBITER_STORE_ROOT").unwrap_or_else(|_| "store".to_string());
    let store = FsStore::new(&store_root);

    info!(
        language = %request.language,
        problem = %request.problem.slug,
        mode = ?request.mode,
        test_cases = request.problem.case_count,
        source_size = request.code.len(),
        "Received judge request"
    );

    let result = match request.mode {
        JudgeMode::Run => {
            judge::run_problem(config, &store, &request.problem, &request.code, request.language)
                .await
        }
        JudgeMode::Submit => {
            judge::judge_submission(
                config,
                &store,
                &request.problem,
                &request.code,
                request.language,
            )
            .await
        }
    };

    match result {
        Ok(report) => {
            info!(
                verdict = %report.verdict,
                cases_judged = report.outcomes.len(),
                execution_time_ms = report.execution_time_ms,
                "Judging completed"
            );
            Ok(serde_json::to_string(&report)?)
        }
        Err(e) => {
            error!(error = %e, "Judging failed");
            Ok(serde_json::to_string(&RunResponse::err(e.to_string()))?)
        }
    }
}
