//! Process composition root for the AI core
//!
//! Owns the explicitly constructed orchestrator, vector store, retrieval
//! client, and pipeline, and shares them across concurrent callers. The
//! upstream request handler holds one `AiService` per process.

use std::path::Path;
use std::sync::Arc;

use crate::config::AiConfig;
use crate::error::Result;
use crate::ingestion::load_text_documents;
use crate::orchestrator::LlmOrchestrator;
use crate::pipeline::QaPipeline;
use crate::prompting::PromptTemplateRegistry;
use crate::retrieval::{RetrievalClient, VectorStore};
use crate::types::{GenerationRequest, GenerationResult, QaRequest, QaResult};

/// Token budget for lesson-plan generation, larger than the QA default
const LESSON_PLAN_MAX_TOKENS: u32 = 1500;

/// Entry point wiring the QA pipeline and its collaborators
pub struct AiService {
    orchestrator: Arc<LlmOrchestrator>,
    retriever: Arc<RetrievalClient>,
    pipeline: QaPipeline,
    prompts: PromptTemplateRegistry,
}

impl AiService {
    /// Wire the full service from configuration
    pub fn new(config: &AiConfig) -> Self {
        let orchestrator = Arc::new(LlmOrchestrator::new(config));
        let store = Arc::new(VectorStore::new(&config.vector_db));
        let retriever = Arc::new(RetrievalClient::new(
            config,
            Arc::clone(&orchestrator),
            store,
        ));
        let pipeline = QaPipeline::new(Arc::clone(&orchestrator), Arc::clone(&retriever));

        tracing::info!(
            default_provider = %config.default_provider,
            mock_mode = config.mock_mode,
            "AI service initialized"
        );

        Self {
            orchestrator,
            retriever,
            pipeline,
            prompts: PromptTemplateRegistry::new(),
        }
    }

    /// Wire the service from environment variables
    pub fn from_env() -> Self {
        Self::new(&AiConfig::from_env())
    }

    /// Shared orchestrator handle
    pub fn orchestrator(&self) -> &Arc<LlmOrchestrator> {
        &self.orchestrator
    }

    /// Answer a learner question through the full QA pipeline
    pub async fn answer_question(&self, request: &QaRequest) -> Result<QaResult> {
        self.pipeline.run(request).await
    }

    /// Generate a teacher-facing lesson plan
    pub async fn generate_lesson_plan(
        &self,
        subject: &str,
        topic: &str,
        objectives: &[String],
        audience: &str,
    ) -> Result<GenerationResult> {
        let prompt = self
            .prompts
            .render_lesson_plan(subject, topic, objectives, audience);
        let request = GenerationRequest::new(prompt)
            .with_system_prompt(self.prompts.get_system_prompt(Some(subject)))
            .with_max_tokens(LESSON_PLAN_MAX_TOKENS);

        self.orchestrator.generate(&request, None).await
    }

    /// Load, chunk, and index learning materials. Returns the number of
    /// chunks produced; indexing is a no-op when the vector index is not
    /// configured.
    pub async fn index_materials(&self, paths: &[impl AsRef<Path>]) -> Result<usize> {
        let chunks = load_text_documents(paths)?;
        if chunks.is_empty() {
            return Ok(0);
        }

        self.retriever.upsert_documents(&chunks).await?;
        tracing::info!(chunks = chunks.len(), "materials indexed");
        Ok(chunks.len())
    }

    /// Probe every provider concurrently. Best-effort: failures are logged
    /// by the providers and never surface here.
    pub async fn warmup(&self) {
        self.orchestrator.warmup_all().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_service() -> AiService {
        let config = AiConfig {
            mock_mode: true,
            ..AiConfig::default()
        };
        AiService::new(&config)
    }

    #[tokio::test]
    async fn test_answer_question_offline() {
        let service = offline_service();
        let request = QaRequest::new("如何计算三角形面积").with_subject("数学");

        let result = service.answer_question(&request).await.unwrap();

        assert_eq!(result.provider, "mock");
        assert_eq!(result.citations.len(), 1);
    }

    #[tokio::test]
    async fn test_lesson_plan_uses_subject_instruction() {
        let service = offline_service();

        let result = service
            .generate_lesson_plan("物理", "牛顿运动定律", &[], "初二学生")
            .await
            .unwrap();

        assert_eq!(result.provider, "mock");
        assert!(result.content.contains("物理老师"));
        assert!(result.content.contains("牛顿运动定律"));
    }

    #[tokio::test]
    async fn test_index_materials_counts_chunks() {
        let service = offline_service();
        let dir = std::env::temp_dir().join("edu-rag-service-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("geometry.txt");
        std::fs::write(&path, "平面几何".repeat(200)).unwrap();

        let indexed = service.index_materials(&[&path]).await.unwrap();

        assert_eq!(indexed, 2);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_index_materials_empty_input() {
        let service = offline_service();

        let indexed = service
            .index_materials(&Vec::<std::path::PathBuf>::new())
            .await
            .unwrap();

        assert_eq!(indexed, 0);
    }

    #[tokio::test]
    async fn test_warmup_completes_offline() {
        let service = offline_service();

        // Providers without credentials skip their probes; warm-up must
        // return without error regardless
        service.warmup().await;
    }
}
