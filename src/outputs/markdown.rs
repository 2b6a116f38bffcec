//! Markdown rendering of a [`View`].

use crate::outputs::view::View;

/// Render a view as a Markdown document.
pub fn view_to_markdown(view: &View) -> String {
    let mut md = String::from("# Headlines\n\n");
    match view {
        View::Loading => md.push_str("_Loading..._\n"),
        View::NoResults { heading, hint } => {
            md.push_str(&format!("## 📭 {heading}\n\n{hint}\n"));
        }
        View::Error {
            heading,
            message,
            retry_hint,
        } => {
            md.push_str(&format!("## ⚠️ {heading}\n\n{message}\n\n_{retry_hint}_\n"));
        }
        View::Cards {
            count_label,
            last_updated,
            cards,
        } => {
            md.push_str(&format!("_{count_label} · {last_updated}_\n"));
            for card in cards {
                md.push_str(&format!(
                    "\n## [{}]({})\n\n",
                    escape_link_text(&card.title),
                    card.url
                ));
                if !card.image_url.is_empty() {
                    md.push_str(&format!(
                        "![{}]({})\n\n",
                        escape_link_text(&card.title),
                        card.image_url
                    ));
                }
                md.push_str(&format!(
                    "`{}` · **{}** · {}\n\n{}\n",
                    card.category_label,
                    card.source_name,
                    card.published,
                    card.description,
                ));
            }
        }
    }
    md
}

/// Brackets in link text would end the link early.
fn escape_link_text(s: &str) -> String {
    s.replace('[', "\\[").replace(']', "\\]")
}
