use std::sync::Arc;

use strum::Display;

use crate::{
    batch::{AnswerRecord, BatchRunner},
    client::Completion,
    error::{AnalysisError, ExportError},
    export,
    generator::{PersonaCount, generate_personas},
    intent::infer_intent,
    persona::Persona,
    questions::questions_for,
};

pub const MISSING_INPUT_PROMPT: &str =
    "Please enter your OpenAI API Key and a keyword to start the analysis.";

/// Whether a run can start with the supplied configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness<'a> {
    Ready { api_key: &'a str, keyword: &'a str },
    /// A credential or keyword is missing; show the prompt instead of running
    NeedsInput { prompt: &'static str },
}

/// Missing input is a precondition, not an error.
pub fn check_inputs<'a>(api_key: Option<&'a str>, keyword: Option<&'a str>) -> Readiness<'a> {
    let api_key = api_key.map(str::trim).filter(|s| !s.is_empty());
    let keyword = keyword.map(str::trim).filter(|s| !s.is_empty());
    match (api_key, keyword) {
        (Some(api_key), Some(keyword)) => Readiness::Ready { api_key, keyword },
        _ => Readiness::NeedsInput {
            prompt: MISSING_INPUT_PROMPT,
        },
    }
}

/// Stages of a run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(to_string = "Analyzing search intent...")]
    IntentAnalysis,
    #[strum(to_string = "Generating personas...")]
    PersonaGeneration,
    #[strum(to_string = "Analyzing personas...")]
    MotivationAnalysis,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub keyword: String,
    pub intent: String,
    pub personas: Vec<Persona>,
    pub questions: Vec<String>,
    pub answers: Vec<AnswerRecord>,
}

impl AnalysisReport {
    pub fn answers_by_persona(&self) -> Vec<(&str, Vec<&AnswerRecord>)> {
        export::group_by_persona(&self.answers)
    }

    pub fn to_csv(&self) -> Result<String, ExportError> {
        export::to_csv(&self.answers)
    }
}

/// Drives intent inference, persona generation and the motivation batch.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<dyn Completion>,
    batch: BatchRunner,
}

impl Analyzer {
    pub fn new(client: Arc<dyn Completion>) -> Self {
        let batch = BatchRunner::new(Arc::clone(&client));
        Self { client, batch }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.batch = self.batch.with_max_concurrency(max_concurrency);
        self
    }

    pub async fn run(
        &self,
        keyword: &str,
        count: PersonaCount,
    ) -> Result<AnalysisReport, AnalysisError> {
        self.run_with_progress(keyword, count, |_| {}).await
    }

    /// Run all stages, calling `on_stage` as each one starts.
    ///
    /// A report is only produced when every stage succeeds.
    pub async fn run_with_progress(
        &self,
        keyword: &str,
        count: PersonaCount,
        mut on_stage: impl FnMut(Stage) + Send,
    ) -> Result<AnalysisReport, AnalysisError> {
        on_stage(Stage::IntentAnalysis);
        let intent = infer_intent(self.client.as_ref(), keyword).await?;

        on_stage(Stage::PersonaGeneration);
        let personas = generate_personas(self.client.as_ref(), keyword, &intent, count).await?;
        log::info!("Generated {} personas for {keyword:?}", personas.len());

        on_stage(Stage::MotivationAnalysis);
        let questions = questions_for(keyword);
        let answers = self.batch.run(&personas, &questions).await?;
        log::info!("Collected {} answers", answers.len());

        Ok(AnalysisReport {
            keyword: keyword.to_string(),
            intent,
            personas,
            questions,
            answers,
        })
    }
}
