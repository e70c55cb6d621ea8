//! sciscore batch entrypoint: score one records file, write the nested report.

use mimalloc::MiMalloc;

use sciscore::config::Config;
use sciscore::embedding::WordVectors;
use sciscore::evaluate::Evaluator;
use sciscore::judge::{HttpJudgeBackend, JudgeClient, JudgeConfig};
use sciscore::prompts::PromptLibrary;
use sciscore::record::load_records;
use sciscore::tasks::TaskRegistry;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let data_path = config.data_path()?;

    tracing::info!(
        data_path = %data_path.display(),
        output_path = %config.output_path.display(),
        "sciscore starting"
    );

    let records = load_records(data_path)?;
    let mut registry = TaskRegistry::builtin();
    if config.generation_tasks {
        registry = registry.with_generation_tasks();
    }
    let mut evaluator = Evaluator::<HttpJudgeBackend>::new(registry);

    if let Some(path) = &config.word2vec_path {
        let vectors = WordVectors::load(path)?;
        tracing::info!(words = vectors.len(), dim = vectors.dim(), "Word vectors loaded");
        evaluator = evaluator.with_word_vectors(vectors);
    } else {
        tracing::warn!("No SCISCORE_WORD2VEC_PATH configured, relation tasks will be unavailable");
    }

    if let Some(path) = &config.prompts_path {
        evaluator = evaluator.with_prompts(PromptLibrary::load(path)?);
    }

    let judge_config = JudgeConfig::from_env();
    match judge_config.api_key.as_deref() {
        Some(api_key) => {
            let backend =
                HttpJudgeBackend::new(&judge_config.base_url, api_key, judge_config.timeout)?;
            tracing::info!(
                model = %judge_config.model,
                endpoint = backend.endpoint(),
                batch_size = judge_config.batch_size,
                "Judge configured"
            );
            let client = JudgeClient::new(backend, judge_config.decoding_params())
                .with_batch_size(judge_config.batch_size);
            evaluator = evaluator.with_judge(client);
        }
        None => {
            tracing::info!("No judge credential configured, judge tasks will be unavailable");
        }
    }

    let report = evaluator.run(&records).await?;
    report.write_to(&config.output_path)?;

    tracing::info!(tasks = report.len(), "sciscore run complete");
    Ok(())
}
