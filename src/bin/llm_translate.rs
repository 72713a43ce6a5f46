use std::io::{self, BufRead};

use llm_translate::TranslationRuntime;
use llm_translate::catalog::ModelDiscoveryRequest;
use llm_translate::config::Settings;
use llm_translate::core::types::{ProviderId, TranslationRequest};
use tracing_subscriber::EnvFilter;

enum Command {
    Translate {
        target: String,
        source: Option<String>,
        texts: Vec<String>,
    },
    Models {
        provider: String,
        api_key: Option<String>,
        refresh: bool,
    },
    Check {
        provider: Option<ProviderId>,
    },
    Engines,
}

struct CliConfig {
    engine: Option<ProviderId>,
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = parse_config(std::env::args().skip(1).collect())?;

    let mut settings = Settings::from_env()?;
    if let Some(engine) = config.engine {
        settings.translation_engine = engine.as_str().to_string();
        settings.machine_translation = true;
    }
    let runtime = TranslationRuntime::builder(settings).build()?;

    match config.command {
        Command::Translate {
            target,
            source,
            texts,
        } => {
            let texts = if texts.is_empty() {
                read_stdin_lines()?
            } else {
                texts
            };
            let strings: TranslationRequest = texts
                .into_iter()
                .enumerate()
                .map(|(index, text)| (index.to_string(), text))
                .collect();

            let translated = runtime
                .translate(&strings, &target, source.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&translated)?);
        }
        Command::Models {
            provider,
            api_key,
            refresh,
        } => {
            let mut request = ModelDiscoveryRequest::new(provider, api_key);
            request.force_refresh = refresh;
            let response = runtime.fetch_models(&request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.is_error() {
                std::process::exit(1);
            }
        }
        Command::Check { provider } => {
            let provider = match provider.or(runtime.settings().active_engine()) {
                Some(provider) => provider,
                None => {
                    return Err("no engine selected; pass --engine or set LLM_TRANSLATE_ENGINE".into());
                }
            };
            let status = runtime.check_api_key(provider).await?;
            if status.error {
                eprintln!("{provider}: {}", status.message);
                std::process::exit(1);
            }
            println!("{provider}: ok");
        }
        Command::Engines => {
            for option in runtime.engines() {
                println!("{}\t{}", option.value, option.label);
            }
        }
    }

    Ok(())
}

fn read_stdin_lines() -> Result<Vec<String>, io::Error> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| !matches!(line, Ok(text) if text.trim().is_empty()))
        .collect()
}

fn parse_config(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut engine = None;
    let mut provider = None;
    let mut api_key = None;
    let mut refresh = false;
    let mut target = None;
    let mut source = None;
    let mut positional = Vec::new();

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--engine" => {
                let value = args
                    .get(i + 1)
                    .ok_or("missing value for --engine (openai|anthropic|openrouter|deepseek)")?;
                engine = Some(value.parse::<ProviderId>()?);
                i += 2;
            }
            "--provider" => {
                provider = Some(args.get(i + 1).ok_or("missing value for --provider")?.clone());
                i += 2;
            }
            "--api-key" => {
                api_key = Some(args.get(i + 1).ok_or("missing value for --api-key")?.clone());
                i += 2;
            }
            "--to" => {
                target = Some(args.get(i + 1).ok_or("missing value for --to")?.clone());
                i += 2;
            }
            "--from" => {
                source = Some(args.get(i + 1).ok_or("missing value for --from")?.clone());
                i += 2;
            }
            "--refresh" => {
                refresh = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with("--") => {
                return Err(format!("unknown argument: {other}").into());
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    if positional.is_empty() {
        print_help();
        return Err("missing command".into());
    }
    let name = positional.remove(0);

    let command = match name.as_str() {
        "translate" => Command::Translate {
            target: target.ok_or("translate needs --to LANGUAGE_CODE")?,
            source,
            texts: positional,
        },
        "models" => Command::Models {
            provider: provider
                .or_else(|| engine.map(|engine| engine.as_str().to_string()))
                .unwrap_or_default(),
            api_key,
            refresh,
        },
        "check" => Command::Check {
            provider: provider
                .map(|value| value.parse::<ProviderId>())
                .transpose()?
                .or(engine),
        },
        "engines" => Command::Engines,
        other => return Err(format!("unknown command: {other}").into()),
    };

    Ok(CliConfig { engine, command })
}

fn print_help() {
    println!(
        "Usage:\n  llm_translate [--engine ENGINE] translate --to de_DE [--from en_US] [TEXT...]\n  llm_translate models --provider PROVIDER [--api-key KEY] [--refresh]\n  llm_translate check [--provider PROVIDER]\n  llm_translate engines\n\nWithout TEXT arguments, translate reads one string per stdin line.\n\nEnv:\n  LLM_TRANSLATE_ENGINE / LLM_TRANSLATE_ENABLED / LLM_TRANSLATE_DEFAULT_LANGUAGE\n  OPENAI_API_KEY / ANTHROPIC_API_KEY / OPENROUTER_API_KEY / DEEPSEEK_API_KEY\n  <PROVIDER>_MODEL / <PROVIDER>_CHUNK_SIZE\n  RUST_LOG (e.g. llm_translate=debug)"
    );
}
