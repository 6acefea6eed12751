//! Story markup renderers.

use snooze_domain::Story;

use crate::ports::outbound::StoryRenderer;

/// Renders a story as the `<li>` used by the story lists.
///
/// Solid star (`fas`) for favorites, hollow (`far`) otherwise; own stories
/// get a trash icon. All story text is HTML-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStoryRenderer;

impl StoryRenderer for HtmlStoryRenderer {
    fn render_story(&self, story: &Story, is_favorite: bool, is_own: bool) -> String {
        let star_class = if is_favorite { "fas" } else { "far" };
        let remove_link = if is_own {
            r#"<i class="fa fa-trash trash-can" aria-hidden="true"></i>"#
        } else {
            ""
        };
        let host = escape_html(story.host_name());

        format!(
            concat!(
                r#"<li id="{id}">"#,
                "{remove}",
                r#"<i class="{star} fa-star"></i>"#,
                r#"<a class="article-link" href="{url}" target="a_blank"><strong>{title}</strong></a>"#,
                r#"<small class="article-author">by {author}</small>"#,
                r#"<small class="article-hostname {host}">({host})</small>"#,
                r#"<small class="article-username">posted by {username}</small>"#,
                "</li>"
            ),
            id = story.id,
            remove = remove_link,
            star = star_class,
            url = escape_html(&story.url),
            title = escape_html(&story.title),
            author = escape_html(&story.author),
            host = host,
            username = escape_html(story.username.as_str()),
        )
    }
}

/// Renders a story as a single line of plain text for terminals.
///
/// `*` marks a favorite, `x` marks a story the user may delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStoryRenderer;

impl StoryRenderer for TextStoryRenderer {
    fn render_story(&self, story: &Story, is_favorite: bool, is_own: bool) -> String {
        format!(
            "{}{} {} ({}) by {}, posted by {} [{}]",
            if is_own { "x" } else { " " },
            if is_favorite { "*" } else { " " },
            story.title,
            story.host_name(),
            story.author,
            story.username,
            story.id
        )
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
