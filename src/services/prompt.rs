use std::str::FromStr;

const IMAGE_COUNT_MARKER: &str = "[IMAGE_COUNT]";

/// Framing of the `/meal` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    #[default]
    Coaching,
    Analysis,
}

impl FromStr for PromptStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coaching" | "coach" => Ok(PromptStyle::Coaching),
            "analysis" | "analyze" => Ok(PromptStyle::Analysis),
            other => anyhow::bail!("unknown prompt style '{}' (expected coaching or analysis)", other),
        }
    }
}

struct Wording {
    role: &'static str,
    qualitative_task: &'static str,
    title: &'static str,
    qualitative_heading: &'static str,
    qualitative_placeholder: &'static str,
    image_count_line: &'static str,
    text_only_line: &'static str,
    failure_reply: &'static str,
}

const COACHING: Wording = Wording {
    role: "As a nutrition coach, analyze the meal(s) and provide nutritional guidance.",
    qualitative_task: "**Coaching advice**: Practical suggestions for improving nutritional balance",
    title: "🍽️ **栄養コーチング結果**",
    qualitative_heading: "💡 **コーチングアドバイス**",
    qualitative_placeholder: "[Practical coaching suggestions for nutritional improvement]",
    image_count_line: "📸 **分析画像数: [IMAGE_COUNT]枚**",
    text_only_line: "📸 **テキスト説明のみでコーチング**",
    failure_reply: "❌ An error occurred while providing coaching for your meal. Please try again later.",
};

const ANALYSIS: Wording = Wording {
    role: "As a nutrition expert, analyze the meal(s) and estimate their nutritional content.",
    qualitative_task: "**Confidence level**: How certain the estimate is (high/medium/low) and why",
    title: "🍽️ **食事分析結果**",
    qualitative_heading: "🎯 **信頼度**",
    qualitative_placeholder: "[Confidence level and the main sources of uncertainty]",
    image_count_line: "📸 **分析画像数: [IMAGE_COUNT]枚**",
    text_only_line: "📸 **テキスト説明のみで分析**",
    failure_reply: "❌ An error occurred while analyzing your meal. Please try again later.",
};

impl PromptStyle {
    fn wording(&self) -> &'static Wording {
        match self {
            PromptStyle::Coaching => &COACHING,
            PromptStyle::Analysis => &ANALYSIS,
        }
    }

    /// Generic apology sent when the download or model call fails.
    pub fn failure_reply(&self) -> &'static str {
        self.wording().failure_reply
    }
}

/// Render the `/meal` prompt. Pure; the model is asked for a fixed layout so
/// its answer can be relayed as-is.
pub fn build_prompt(style: PromptStyle, description: Option<&str>, image_count: usize) -> String {
    let w = style.wording();

    let count_line = if image_count == 0 {
        w.text_only_line.to_string()
    } else {
        w.image_count_line
            .replace(IMAGE_COUNT_MARKER, &image_count.to_string())
    };

    let template = format!(
        "{role} Focus specifically on:\n\
         \n\
         1. **Calories (kcal)**: Provide a specific estimate and a reasonable range\n\
         2. **Protein (g)**: Provide a specific estimate and a reasonable range\n\
         3. {qualitative_task}\n\
         4. **Analysis basis**: Brief explanation of what foods you identified\n\
         \n\
         Format your response EXACTLY as follows:\n\
         \n\
         {title}\n\
         \n\
         📊 **栄養情報**\n\
         • カロリー: [NUMBER] kcal (推定範囲: [LOW]-[HIGH] kcal)\n\
         • タンパク質: [NUMBER]g (推定範囲: [LOW]-[HIGH]g)\n\
         \n\
         {qualitative_heading}\n\
         {qualitative_placeholder}\n\
         \n\
         📝 **分析内容**\n\
         [Brief description of identified foods and analysis basis]\n\
         \n\
         {count_line}",
        role = w.role,
        qualitative_task = w.qualitative_task,
        title = w.title,
        qualitative_heading = w.qualitative_heading,
        qualitative_placeholder = w.qualitative_placeholder,
        count_line = count_line,
    );

    match description.filter(|d| !d.is_empty()) {
        Some(description) => format!("User description: {}\n\n{}", description, template),
        None => template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_marker_without_images() {
        for style in [PromptStyle::Coaching, PromptStyle::Analysis] {
            let prompt = build_prompt(style, Some("miso soup"), 0);
            assert!(prompt.contains(style.wording().text_only_line));
            assert!(!prompt.contains("分析画像数"));
            assert!(!prompt.contains(IMAGE_COUNT_MARKER));
        }
    }

    #[test]
    fn test_image_count_is_substituted() {
        for count in 1..=5 {
            let prompt = build_prompt(PromptStyle::Coaching, None, count);
            assert!(prompt.ends_with(&format!("📸 **分析画像数: {}枚**", count)));
            assert!(!prompt.contains(COACHING.text_only_line));
        }
    }

    #[test]
    fn test_nutrient_placeholders_survive_count_substitution() {
        let prompt = build_prompt(PromptStyle::Coaching, None, 3);
        assert!(prompt.contains("• カロリー: [NUMBER] kcal (推定範囲: [LOW]-[HIGH] kcal)"));
        assert!(prompt.contains("• タンパク質: [NUMBER]g"));
    }

    #[test]
    fn test_description_prefix() {
        let prompt = build_prompt(PromptStyle::Coaching, Some("grilled chicken and rice"), 1);
        assert!(prompt.starts_with("User description: grilled chicken and rice\n\n"));

        let prompt = build_prompt(PromptStyle::Coaching, None, 1);
        assert!(prompt.starts_with("As a nutrition coach"));

        let prompt = build_prompt(PromptStyle::Coaching, Some(""), 1);
        assert!(!prompt.starts_with("User description"));
    }

    #[test]
    fn test_styles_differ_only_in_wording() {
        let coaching = build_prompt(PromptStyle::Coaching, None, 2);
        let analysis = build_prompt(PromptStyle::Analysis, None, 2);

        assert!(coaching.contains("💡 **コーチングアドバイス**"));
        assert!(analysis.contains("🎯 **信頼度**"));
        assert!(analysis.contains("📸 **分析画像数: 2枚**"));
        assert_ne!(coaching, analysis);
    }

    #[test]
    fn test_prompt_style_from_str() {
        assert_eq!("coaching".parse::<PromptStyle>().unwrap(), PromptStyle::Coaching);
        assert_eq!(" Analysis ".parse::<PromptStyle>().unwrap(), PromptStyle::Analysis);
        assert!("poetry".parse::<PromptStyle>().is_err());
    }
}
