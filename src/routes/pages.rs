//! Server-rendered single page.
//!
//! Each request maps to one interaction: no selection shows the trending
//! strip, a selection shows its poster, and `recommend=true` adds the
//! recommendation grid.

use std::fmt::Write;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::{
    error::LookupError,
    middleware::request_id::RequestId,
    models::{Movie, Poster, RecommendedMovie},
    routes::{posters::trending_posters, recommendations::with_posters},
    services::recommendations,
    state::AppState,
};

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1200px; padding: 1rem; }
.main-header { font-size: 2.5rem; font-weight: 700; color: #FF4B4B; text-align: center; }
.subheader { font-size: 1.5rem; font-weight: 500; margin-bottom: 2rem; text-align: center; }
.layout { display: grid; grid-template-columns: 3fr 1fr; gap: 2rem; }
.recommendation-header { font-size: 1.8rem; font-weight: 600; margin: 2rem 0 1rem; color: #FF4B4B; text-align: center; }
.cards { display: grid; grid-template-columns: repeat(5, 1fr); gap: 1rem; }
.card img { width: 100%; }
.movie-title { font-weight: 600; text-align: center; height: 3em; display: flex; align-items: center; justify-content: center; }
.trending { display: flex; gap: 0.5rem; overflow-x: auto; }
.trending img { height: 200px; }
.button { background-color: #FF4B4B; color: white; font-weight: 600; border: 0; border-radius: 5px; padding: 0.5rem 1rem; text-decoration: none; display: inline-block; }
.info { background: #e8f0fe; padding: 1rem; border-radius: 5px; }
.error { background: #fdecea; color: #b71c1c; padding: 1rem; border-radius: 5px; }
"#;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub movie: Option<String>,
    #[serde(default)]
    pub recommend: bool,
}

/// What the page shows below the selector
enum Selection {
    Idle { trending: Vec<Poster> },
    Unknown { title: String },
    Selected {
        movie: Movie,
        poster_url: String,
        recommendations: Option<Vec<RecommendedMovie>>,
    },
}

/// Handler for the page
pub async fn index(
    State(state): State<Arc<AppState>>,
    request_id: RequestId,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let selected = query.movie.filter(|title| !title.is_empty());

    let selection = match selected {
        None => Selection::Idle {
            trending: trending_posters(&state).await,
        },
        Some(title) => select(&state, request_id, title, query.recommend).await,
    };

    Html(render_page(&state, &selection))
}

async fn select(state: &AppState, request_id: RequestId, title: String, recommend: bool) -> Selection {
    let Some(movie) = state.snapshot.catalog.find_by_title(&title).cloned() else {
        tracing::info!(request_id = %request_id, title = %title, "Selected title not in catalog");
        return Selection::Unknown { title };
    };

    let poster_url = state.posters.resolve(movie.id).await;

    let recommendations = if recommend {
        match recommendations::recommend(&state.snapshot.catalog, &state.snapshot.matrix, &title) {
            Ok(movies) => Some(with_posters(state, movies).await),
            Err(LookupError::NotFound(_)) => Some(Vec::new()),
        }
    } else {
        None
    };

    tracing::info!(
        request_id = %request_id,
        title = %title,
        recommended = recommendations.as_ref().map(Vec::len),
        "Page rendered for selection"
    );

    Selection::Selected {
        movie,
        poster_url,
        recommendations,
    }
}

fn render_page(state: &AppState, selection: &Selection) -> String {
    let selected_title = match selection {
        Selection::Selected { movie, .. } => Some(movie.title.as_str()),
        Selection::Unknown { title } => Some(title.as_str()),
        Selection::Idle { .. } => None,
    };

    let mut body = String::new();
    body.push_str(r#"<div class="main-header">&#127916; Movie Recommendation System</div>"#);
    body.push_str(r#"<div class="subheader">Find movies similar to your favorites!</div>"#);
    body.push_str(r#"<div class="layout"><div>"#);
    render_selector(&mut body, state.snapshot.catalog.titles(), selected_title);

    match selection {
        Selection::Idle { trending } => render_trending(&mut body, trending),
        Selection::Unknown { .. } => render_no_recommendations(&mut body),
        Selection::Selected {
            movie,
            poster_url,
            recommendations,
        } => {
            let _ = write!(
                body,
                r#"<figure><img src="{}" width="250" alt="{title}"><figcaption>{title}</figcaption></figure>"#,
                html_escape(poster_url),
                title = html_escape(&movie.title),
            );
            let _ = write!(
                body,
                r#"<a class="button" href="/?movie={}&amp;recommend=true">Get Recommendations</a>"#,
                urlencoding::encode(&movie.title),
            );
            if let Some(recommendations) = recommendations {
                render_recommendations(&mut body, &movie.title, recommendations);
            }
        }
    }

    body.push_str("</div>");
    body.push_str(
        "<aside><h3>How it works</h3><ol>\
         <li>Select a movie you like from the dropdown</li>\
         <li>Click 'Get Recommendations'</li>\
         <li>See 5 similar movies you might enjoy!</li>\
         </ol></aside></div>",
    );
    body.push_str("<hr><p>Made with &#10084;&#65039; using the TMDB API</p>");

    wrap_document(&body)
}

fn render_selector<'a>(
    body: &mut String,
    titles: impl Iterator<Item = &'a str>,
    selected: Option<&str>,
) {
    body.push_str(r#"<form method="get" action="/">"#);
    body.push_str(r#"<label for="movie">Search for a movie you like:</label> "#);
    let _ = write!(
        body,
        r#"<input id="movie" name="movie" list="titles" placeholder="Type to search for a movie..." value="{}"> "#,
        html_escape(selected.unwrap_or_default()),
    );
    body.push_str(r#"<button class="button" type="submit">Select</button>"#);
    body.push_str(r#"<datalist id="titles">"#);
    for title in titles {
        let _ = write!(body, r#"<option value="{}">"#, html_escape(title));
    }
    body.push_str("</datalist></form>");
}

fn render_trending(body: &mut String, trending: &[Poster]) {
    body.push_str(r#"<h3>Trending Movies</h3><div class="trending">"#);
    for poster in trending {
        let _ = write!(
            body,
            r#"<img src="{}" alt="Movie {}">"#,
            html_escape(&poster.poster_url),
            poster.movie_id,
        );
    }
    body.push_str("</div>");
}

fn render_recommendations(body: &mut String, selected: &str, recommendations: &[RecommendedMovie]) {
    let _ = write!(
        body,
        r#"<div class="recommendation-header">Movies similar to "{}"</div>"#,
        html_escape(selected),
    );

    if recommendations.is_empty() {
        render_no_recommendations(body);
        return;
    }

    body.push_str(r#"<div class="cards">"#);
    for movie in recommendations {
        let _ = write!(
            body,
            r#"<div class="card"><img src="{}" alt="{title}"><div class="movie-title">{title}</div><a class="button" href="/?movie={}">Select</a></div>"#,
            html_escape(&movie.poster_url),
            urlencoding::encode(&movie.title),
            title = html_escape(&movie.title),
        );
    }
    body.push_str("</div>");
}

fn render_no_recommendations(body: &mut String) {
    body.push_str(r#"<p class="info">No recommendations found. Please try another movie.</p>"#);
}

/// Blocking error screen used when the catalog failed to load
pub fn render_unavailable(message: &str) -> String {
    let body = format!(
        r#"<div class="main-header">&#127916; Movie Recommendation System</div><p class="error">Failed to load necessary data. Please check your data files.<br>{}</p>"#,
        html_escape(message)
    );
    wrap_document(&body)
}

fn wrap_document(body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Movie Recommendation System</title><style>{}</style></head>\
         <body>{}</body></html>",
        STYLE, body
    )
}

fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}
