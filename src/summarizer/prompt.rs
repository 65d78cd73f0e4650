//! Prompt construction for summaries and follow-up answers

use crate::crawler::PageRecord;
use crate::url::NormalizedUrl;
use std::fmt::Write;

/// Characters of each page included in the summary prompt
pub const SUMMARY_PAGE_CHARS: usize = 3_000;

/// Characters of each page included in the question prompt
pub const ANSWER_PAGE_CHARS: usize = 3_500;

/// Renders the crawled pages as numbered prompt sections
///
/// Each page's content is cut to `limit` characters, with a truncation marker
/// when something was dropped.
pub fn render_pages(pages: &[PageRecord], limit: usize) -> String {
    let mut out = String::new();
    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            out.push_str("\n\n");
        }
        let truncated = page.content.chars().count() > limit;
        let excerpt: String = page.content.chars().take(limit).collect();

        let _ = write!(
            out,
            "PAGE {}: {}\nURL: {}\nCONTENT:\n{}\n{}---\n",
            index + 1,
            page.title,
            page.url,
            excerpt,
            if truncated { "...(truncated)\n" } else { "" }
        );
    }
    out
}

/// Builds the prompt for the initial site summary
pub fn summary_prompt(pages: &[PageRecord], origin: &NormalizedUrl) -> String {
    format!(
        r#"You are an expert web analyst providing a concise initial summary of a website.

WEBSITE: {origin}
PAGES ANALYZED: {count}

CONTENT FROM CRAWLED PAGES:
{content}

INSTRUCTIONS:
Create a brief, scannable summary that gives the user a quick understanding. Keep it concise and informative.

**## What This Site Is About**
Write 2-3 sentences clearly explaining what this company/website does and their main value proposition.

**## Key Highlights**
List 4-6 of the most important or interesting points about this site (products, features, or notable aspects). Use bullet points (-).

**## Industry & Audience**
In 1-2 sentences, state the industry and who this is for.

**## Ask Me More**
Suggest 2-3 specific follow-up questions the user might want to ask, formatted as:
- "What are their main products?"
- "Who are their target customers?"
- "What makes them unique?"

FORMAT:
- Keep it brief and scannable
- Use bullet points for lists
- Be specific and factual
- Write in a friendly, professional tone
- Make the suggested questions relevant to THIS specific website"#,
        origin = origin,
        count = pages.len(),
        content = render_pages(pages, SUMMARY_PAGE_CHARS),
    )
}

/// Builds the prompt for a follow-up question
pub fn question_prompt(question: &str, pages: &[PageRecord], origin: &NormalizedUrl) -> String {
    format!(
        r#"You are an AI assistant helping users understand information from a website that has been analyzed.

Website analyzed: {origin}
Number of pages crawled: {count}

Here is the content from the crawled pages:

{content}

USER QUESTION: {question}

INSTRUCTIONS:
- Answer the question directly and comprehensively based on the website content above
- Be specific and detailed - this is a follow-up question where the user wants in-depth information
- Use bullet points or lists when appropriate for clarity
- Include relevant examples or specifics from the pages
- If the question asks for a list, provide as many items as you can find (5-10+ items if available)
- Use markdown formatting for better readability (headings, bold, lists)
- If the information isn't in the crawled content, say so politely

Keep your answer focused, informative, and well-structured."#,
        origin = origin,
        count = pages.len(),
        content = render_pages(pages, ANSWER_PAGE_CHARS),
        question = question,
    )
}
