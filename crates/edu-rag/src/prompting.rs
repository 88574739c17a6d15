//! Subject-aware prompt templates

use serde_json::Value;

use crate::types::Metadata;

/// Placeholder used when retrieval produced no material
const EMPTY_CONTEXT: &str = "暂无相关资料";

/// System instruction per subject. Unknown or absent subjects map to the
/// general entry.
fn subject_prompt(subject: &str) -> Option<&'static str> {
    let prompt = match subject {
        "数学" => "你是一名资深的数学老师，请以循序渐进的方式引导学生理解问题。",
        "物理" => "你是一名物理老师，请结合公式和原理给出解释。",
        "化学" => "你是一名化学老师，强调实验步骤与安全注意事项。",
        "英语" => "你是一名英语老师，请关注语法与词汇点。",
        "语文" => "你是一名语文老师，注意阅读理解与写作技巧。",
        "其他" => GENERAL_PROMPT,
        _ => return None,
    };
    Some(prompt)
}

const GENERAL_PROMPT: &str = "你是一名全科学习顾问，请提供清晰且富有启发的讲解。";

/// Maps subjects to system instructions and renders structured user prompts
#[derive(Debug, Default, Clone)]
pub struct PromptTemplateRegistry;

impl PromptTemplateRegistry {
    /// Create a registry over the fixed subject table
    pub fn new() -> Self {
        Self
    }

    /// Look up the system instruction for a subject. Total: unknown or
    /// absent subjects fall back to the general entry.
    pub fn get_system_prompt(&self, subject: Option<&str>) -> &'static str {
        subject
            .and_then(subject_prompt)
            .unwrap_or(GENERAL_PROMPT)
    }

    /// Render the structured user prompt from question, retrieved context,
    /// and learner profile.
    ///
    /// The four output sections (analysis, step-by-step solution, mistake
    /// correction, follow-up practice) are a contract relied on by callers
    /// and tests; their order never changes.
    pub fn render(&self, question: &str, context: &str, user_context: &Metadata) -> String {
        let context = if context.is_empty() {
            EMPTY_CONTEXT
        } else {
            context
        };

        let user_profile = if user_context.is_empty() {
            serde_json::json!({"level": "未知", "goals": []})
        } else {
            Value::Object(user_context.clone())
        };

        format!(
            "请结合以下材料，为学生提供详细的解析与学习建议。\n\
             \n\
             【学生问题】\n\
             {question}\n\
             \n\
             【检索资料】\n\
             {context}\n\
             \n\
             【学习者画像】\n\
             {user_profile}\n\
             \n\
             请输出：\n\
             1. 题目分析\n\
             2. 分步解题过程（必要时包含公式）\n\
             3. 常见错误及纠正\n\
             4. 后续巩固建议\n"
        )
    }

    /// Render a lesson-plan prompt for teacher-facing generation
    pub fn render_lesson_plan(
        &self,
        subject: &str,
        topic: &str,
        objectives: &[String],
        audience: &str,
    ) -> String {
        let objectives = if objectives.is_empty() {
            "（未提供，请根据主题自行拟定）".to_string()
        } else {
            objectives
                .iter()
                .enumerate()
                .map(|(i, objective)| format!("{}. {}", i + 1, objective))
                .collect::<Vec<_>>()
                .join("\n")
        };

        format!(
            "请为以下教学场景设计一份课程计划。\n\
             \n\
             【学科】\n\
             {subject}\n\
             \n\
             【课程主题】\n\
             {topic}\n\
             \n\
             【教学目标】\n\
             {objectives}\n\
             \n\
             【授课对象】\n\
             {audience}\n\
             \n\
             请输出：\n\
             1. 课程导入\n\
             2. 分阶段教学安排（含时间分配）\n\
             3. 课堂练习与互动设计\n\
             4. 课后作业与评估方式\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_subject() {
        let registry = PromptTemplateRegistry::new();

        let prompt = registry.get_system_prompt(Some("数学"));

        assert!(prompt.contains("数学老师"));
    }

    #[test]
    fn test_unknown_subject_maps_to_general() {
        let registry = PromptTemplateRegistry::new();

        assert_eq!(
            registry.get_system_prompt(Some("天文")),
            registry.get_system_prompt(None)
        );
        assert!(registry.get_system_prompt(None).contains("全科学习顾问"));
    }

    #[test]
    fn test_render_substitutes_question_and_context() {
        let registry = PromptTemplateRegistry::new();

        let prompt = registry.render("求解二次方程", "一元二次方程的求根公式", &Metadata::new());

        assert!(prompt.contains("求解二次方程"));
        assert!(prompt.contains("一元二次方程的求根公式"));
    }

    #[test]
    fn test_render_empty_context_placeholder() {
        let registry = PromptTemplateRegistry::new();

        let prompt = registry.render("求解二次方程", "", &Metadata::new());

        assert!(prompt.contains("暂无相关资料"));
    }

    #[test]
    fn test_render_default_profile_when_empty() {
        let registry = PromptTemplateRegistry::new();

        let prompt = registry.render("问题", "材料", &Metadata::new());

        assert!(prompt.contains("未知"));
        assert!(prompt.contains("goals"));
    }

    #[test]
    fn test_render_section_order() {
        let registry = PromptTemplateRegistry::new();
        let mut profile = Metadata::new();
        profile.insert("level".to_string(), "初二".into());

        let prompt = registry.render("问题", "材料", &profile);

        let analysis = prompt.find("题目分析").unwrap();
        let solution = prompt.find("分步解题过程").unwrap();
        let mistakes = prompt.find("常见错误及纠正").unwrap();
        let practice = prompt.find("后续巩固建议").unwrap();
        assert!(analysis < solution);
        assert!(solution < mistakes);
        assert!(mistakes < practice);
        assert!(prompt.contains("初二"));
    }

    #[test]
    fn test_lesson_plan_lists_objectives() {
        let registry = PromptTemplateRegistry::new();
        let objectives = vec!["掌握求根公式".to_string(), "理解判别式".to_string()];

        let prompt = registry.render_lesson_plan("数学", "一元二次方程", &objectives, "初三学生");

        assert!(prompt.contains("1. 掌握求根公式"));
        assert!(prompt.contains("2. 理解判别式"));
        assert!(prompt.contains("初三学生"));
    }
}
