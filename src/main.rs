use clap::Parser;
use healthapp_api_check::config::cli::{CheckArgs, Command};
use healthapp_api_check::core::source_audit;
use healthapp_api_check::core::suite::CaseOutcome;
use healthapp_api_check::utils::{logger, validation::Validate};
use healthapp_api_check::{
    ApiSuite, CliConfig, FieldValidator, HarnessError, Operation, RequestExecutor, Result,
    SuiteConfig, SuiteSummary,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting healthapp-api-check");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let outcome = match &config.command {
        Command::Run { config, only } => run_suite(config, only).await,
        Command::Check(args) => run_check(args).await,
        Command::Audit {
            file,
            method,
            tokens,
        } => run_audit(file, method, tokens),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        // 驗證失敗
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("❌ {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            ExitCode::from(1)
        }
    }
}

async fn run_suite(config_path: &str, only: &[String]) -> Result<bool> {
    tracing::info!("📁 Loading suite from: {}", config_path);

    let config = SuiteConfig::from_file(config_path)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    let only_operations = only
        .iter()
        .map(|name| {
            name.parse::<Operation>()
                .map_err(|e| HarnessError::InvalidConfigValueError {
                    field: "only".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let executor = RequestExecutor::from_config(&config, config.token_source());
    tracing::info!("🌐 Target: {}", executor.base_url());
    let validator = FieldValidator::new(config.expectations.clone());
    let mut suite = ApiSuite::new(config.suite.name.clone(), executor, validator)
        .with_cases(config.cases.clone());

    if !only_operations.is_empty() {
        suite.retain_operations(&only_operations);
        tracing::info!("🔧 Limited to {} case(s)", suite.cases().len());
    }

    let outcomes = suite.run().await?;
    print_outcomes(&outcomes);
    let summary = SuiteSummary::from_outcomes(&outcomes);

    println!(
        "📈 {} cases: {} passed, {} failed ({:?})",
        summary.total, summary.passed, summary.failed, summary.total_duration
    );
    for name in &summary.failed_cases {
        println!("  ❌ {}", name);
    }

    Ok(summary.all_passed())
}

async fn run_check(args: &CheckArgs) -> Result<bool> {
    args.validate()?;

    let executor = RequestExecutor::from_config(args, args.token_source());
    tracing::info!("🌐 Target: {}", executor.base_url());

    let suite = ApiSuite::new("check", executor, FieldValidator::new(args.expectations()))
        .with_cases([args.suite_case()?]);

    let outcomes = suite.run().await?;
    print_outcomes(&outcomes);

    Ok(SuiteSummary::from_outcomes(&outcomes).all_passed())
}

fn print_outcomes(outcomes: &[CaseOutcome]) {
    for outcome in outcomes {
        if let Some(expected) = outcome.expected_status.filter(|_| !outcome.status_matches()) {
            println!(
                "❌ {}: expected HTTP {} but got {}",
                outcome.case_name, expected, outcome.status_code
            );
        }
        for failure in &outcome.report.failures {
            println!("  ❌ {}", failure);
        }
        println!(
            "{} {} (HTTP {})",
            if outcome.passed() { "✅" } else { "❌" },
            outcome.case_name,
            outcome.status_code
        );
    }
}

fn run_audit(file: &str, method: &str, tokens: &[String]) -> Result<bool> {
    let report = source_audit::audit_file(file, method, tokens)?;

    if !report.method_found {
        println!("❌ Method {} not found in {}", method, file);
    }
    for token in &report.missing {
        println!("  ❌ '{}()' is missing in the method.", token);
    }
    if report.passed() {
        println!("✅ {} calls all of: {}", method, tokens.join(", "));
    }

    Ok(report.passed())
}
