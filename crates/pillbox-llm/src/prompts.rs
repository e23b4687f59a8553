//! Prompts for symptom analysis, the health assistant and label reading.

/// System prompt for symptom analysis.
pub const SYMPTOM_SYSTEM_PROMPT: &str = r#"You are a careful health assistant for a household medicine cabinet.

Suggest common over-the-counter medicines and general self-care for the symptoms described.
Never diagnose. Always remind the user to consult a healthcare professional for serious or persistent symptoms.

Reply with a single JSON object and nothing else."#;

/// User prompt asking for a symptom analysis in the expected JSON shape.
pub fn make_symptom_prompt(symptoms: &str, age: Option<u32>) -> String {
    let age_note = age.map(|a| format!(" (Age: {})", a)).unwrap_or_default();
    format!(
        r#"Analyze these symptoms and provide medical recommendations: "{}"{}

Please respond in this exact JSON format:
{{
  "recommendedMedicines": ["medicine1", "medicine2", "medicine3"],
  "possibleConditions": ["condition1", "condition2", "condition3"],
  "selfCareAdvice": ["advice1", "advice2", "advice3"]
}}

Focus on common over-the-counter medications and general health advice."#,
        symptoms.trim(),
        age_note
    )
}

/// System prompt for the free-form health assistant.
pub const HEALTH_ASSISTANT_SYSTEM_PROMPT: &str = r#"You are a helpful health assistant.

Provide helpful, accurate and safe health advice. Keep answers short and practical.
Always remind users to consult healthcare professionals for serious concerns."#;

/// Single-turn health question for the assistant.
pub fn make_chat_prompt(question: &str) -> String {
    format!(
        "Please provide helpful, accurate, and safe health advice for the following question. \
         Always remind me to consult healthcare professionals for serious concerns: {}",
        question.trim()
    )
}

/// System prompt for reading medicine packaging.
pub const LABEL_SYSTEM_PROMPT: &str = r#"You read OCR text scanned from medicine packaging.

Extract:
- name: The product name as printed (brand or generic, with strength if shown)
- expiryDate: The expiry date as YYYY-MM-DD

Labels often print only a month and year for expiry (e.g. "EXP 03/2026"). Use the last day of that month.
Ignore manufacturing dates, batch numbers and prices.
Use null for anything you cannot find."#;

/// User prompt for label reading.
pub fn make_label_prompt(ocr_text: &str) -> String {
    format!(
        r#"Read this medicine label:

"{}"

Return a JSON object with:
- name: The medicine name (null if not found)
- expiryDate: Expiry date as YYYY-MM-DD (null if not found)"#,
        ocr_text.trim()
    )
}

/// Example label readings for few-shot prompting.
pub const LABEL_FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "PARACETAMOL 500mg\nTablets BP\nB.No. PX2231\nMFG 04/2024\nEXP 03/2027",
        r#"{"name":"Paracetamol 500mg","expiryDate":"2027-03-31"}"#,
    ),
    (
        "Cetirizine Hydrochloride\n10 mg film-coated tablets\nUse by: 15/08/2026",
        r#"{"name":"Cetirizine Hydrochloride 10 mg","expiryDate":"2026-08-15"}"#,
    ),
    (
        "Keep out of reach of children\nStore below 25C",
        r#"{"name":null,"expiryDate":null}"#,
    ),
];

/// Wrap a system prompt and turns in chat-template markers.
fn chat_prompt(system: &str, examples: &[(String, &str)], request: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("<|system|>\n");
    prompt.push_str(system);
    prompt.push_str("\n<|end|>\n");

    for (input, output) in examples {
        prompt.push_str("<|user|>\n");
        prompt.push_str(input);
        prompt.push_str("\n<|end|>\n");
        prompt.push_str("<|assistant|>\n");
        prompt.push_str(output);
        prompt.push_str("\n<|end|>\n");
    }

    prompt.push_str("<|user|>\n");
    prompt.push_str(request);
    prompt.push_str("\n<|end|>\n");
    prompt.push_str("<|assistant|>\n");

    prompt
}

/// Complete symptom-analysis prompt with system context.
pub fn build_symptom_prompt(symptoms: &str, age: Option<u32>) -> String {
    chat_prompt(SYMPTOM_SYSTEM_PROMPT, &[], &make_symptom_prompt(symptoms, age))
}

/// Complete health-assistant prompt with system context.
pub fn build_chat_prompt(question: &str) -> String {
    chat_prompt(HEALTH_ASSISTANT_SYSTEM_PROMPT, &[], &make_chat_prompt(question))
}

/// Complete label-reading prompt, optionally with few-shot examples.
pub fn build_label_prompt(ocr_text: &str, include_examples: bool) -> String {
    let examples: Vec<(String, &str)> = if include_examples {
        LABEL_FEW_SHOT_EXAMPLES
            .iter()
            .map(|(input, output)| (make_label_prompt(input), *output))
            .collect()
    } else {
        Vec::new()
    };
    chat_prompt(LABEL_SYSTEM_PROMPT, &examples, &make_label_prompt(ocr_text))
}
