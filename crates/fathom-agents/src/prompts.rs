//! Prompt bodies for every reasoning stage. The stage marker line is added
//! by the reasoning client.

use fathom_core::models::{Answer, EvidenceSet, Feedback, Question, SubQuery};

pub fn classify(question: &Question) -> String {
    format!(
        "You are a workflow orchestrator for a financial research assistant.\n\
         Classify the user question.\n\n\
         Question: {question}\n\n\
         - route: \"DIRECT\" when it is general knowledge, a definition or conversational \
         and needs no document lookup; \"RESEARCH\" when it needs facts or figures from \
         filings, news or other documents.\n\
         - complexity: \"SIMPLE\" or \"COMPLEX\".\n\
         - category: \"financial\", \"risk\", \"market\" or \"general\".\n\n\
         Return ONLY a JSON object.\n\
         Example: {{\"route\": \"RESEARCH\", \"complexity\": \"COMPLEX\", \"category\": \"financial\"}}",
        question = question.text()
    )
}

pub fn direct_answer(question: &Question) -> String {
    format!(
        "You are a helpful financial assistant. Answer the question briefly and plainly \
         in at most three sentences. Do not invent company-specific figures.\n\n\
         Question: {}",
        question.text()
    )
}

pub fn plan(
    question: &Question,
    min: usize,
    max: usize,
    prior: Option<(&[SubQuery], &Feedback)>,
) -> String {
    let mut prompt = format!(
        "You are a research planner. Break the user question into between {min} and {max} \
         specific, disjoint search queries.\n\n\
         Question: {question}\n\n\
         Available sources:\n\
         1. SEC filings (10-K, 10-Q): financial statements, revenue, risks. Best for hard numbers.\n\
         2. News articles: market sentiment, recent events. Best for trends.\n\
         3. Encyclopedic articles: company history and business model. Best for context.\n\n\
         Rules:\n\
         - Each query targets one fact answerable by the sources above.\n\
         - Name the companies, periods and metrics from the question explicitly.\n\
         - Do not ask for interviews, expert opinions or proprietary data.\n",
        question = question.text()
    );
    if let Some((previous, feedback)) = prior {
        prompt.push_str("\nThe previous research round was rejected. Reviewer feedback:\n");
        prompt.push_str(&feedback.render());
        prompt.push_str("\n\nPrevious queries:\n");
        for q in previous {
            prompt.push_str(&format!("- {}\n", q.text));
        }
        prompt.push_str(
            "\nWrite a revised set that targets what the feedback says is missing. \
             Do not repeat the previous set unchanged.\n",
        );
    }
    prompt.push_str(
        "\nReturn ONLY a JSON object with a \"sub_queries\" list of strings.\n\
         Example: {\"sub_queries\": [\"Company A revenue fiscal 2023 10-K\", \"Company B revenue fiscal 2023 10-K\"]}",
    );
    prompt
}

/// Evidence enumerated as `[n] publisher | type | date | group` plus text.
pub fn evidence_block(evidence: &EvidenceSet) -> String {
    let mut block = String::new();
    for (i, c) in evidence.iter().enumerate() {
        block.push_str(&format!("[{}] {}\n{}\n\n", i + 1, c.metadata.label(), c.text));
    }
    block
}

pub fn synthesize(question: &Question, evidence: &EvidenceSet) -> String {
    format!(
        "You are a financial analyst. Answer the question using ONLY the numbered evidence \
         below. Do not use outside knowledge: every figure and fact must come from the evidence.\n\n\
         Question: {question}\n\n\
         Evidence:\n{evidence}\
         Rules:\n\
         - Every finding and analysis point cites at least one evidence number, e.g. [1].\n\
         - If evidence conflicts, state both positions with their citations.\n\
         - List every part of the question the evidence does not cover under \"gaps\".\n\n\
         Return ONLY a JSON object:\n\
         {{\"summary\": \"...\", \
         \"findings\": [{{\"text\": \"...\", \"citations\": [1]}}], \
         \"analysis\": [{{\"text\": \"...\", \"citations\": [1, 2]}}], \
         \"gaps\": [\"...\"]}}",
        question = question.text(),
        evidence = evidence_block(evidence),
    )
}

pub fn evaluate(question: &Question, answer: &Answer, evidence: &EvidenceSet) -> String {
    let mut claims = String::new();
    for (i, claim) in answer.claims().enumerate() {
        let refs: Vec<String> = claim.citations.iter().map(|c| format!("[{c}]")).collect();
        claims.push_str(&format!("{}. {} {}\n", i + 1, claim.text, refs.join("")));
    }
    let gaps = if answer.gaps.is_empty() {
        "none".to_string()
    } else {
        answer.gaps.join("; ")
    };
    format!(
        "You are a fact checker. Verify the answer against the numbered evidence.\n\n\
         Question: {question}\n\n\
         Evidence:\n{evidence}\
         Answer summary: {summary}\n\
         Answer claims:\n{claims}\n\
         Reported gaps: {gaps}\n\n\
         Judge:\n\
         - hallucination_score: 0.0 when every claim is supported by its cited evidence, \
         1.0 when none is.\n\
         - complete: true only if the answer covers every part of the question.\n\
         - missing: the parts of the question that are not covered.\n\
         - feedback: one or two sentences telling a researcher what to look for next.\n\n\
         Return ONLY a JSON object:\n\
         {{\"hallucination_score\": 0.0, \"complete\": true, \"missing\": [], \"feedback\": \"...\"}}",
        question = question.text(),
        evidence = evidence_block(evidence),
        summary = answer.summary,
    )
}
