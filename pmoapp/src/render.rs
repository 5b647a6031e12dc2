//! Rendu HTML de la vue
//!
//! La page est entièrement produite côté serveur à partir de [`ViewState`].
//! Les actions (recherche, sélection, retour) sont des liens ou formulaires
//! GET vers la vue elle-même, la déconnexion un POST vers `/auth/signout`.

use crate::controller::{Phase, ViewState};
use htmlescape::encode_minimal;
use pmoyoutube::{Playlist, PlaylistItem};
use std::fmt::Write;
use url::form_urlencoded;

pub const PAGE_TITLE: &str = "YouTube Playlists";
pub const SIGNIN_PATH: &str = "/auth/signin";
pub const SIGNOUT_PATH: &str = "/auth/signout";
pub const STYLESHEET_PATH: &str = "/assets/style.css";

/// Lien vers la vue avec les paramètres donnés
pub fn view_link(base: &str, channel: Option<&str>, playlist: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(channel) = channel.filter(|c| !c.is_empty()) {
        query.append_pair("channel", channel);
    }
    if let Some(playlist) = playlist.filter(|p| !p.is_empty()) {
        query.append_pair("playlist", playlist);
    }
    let query = query.finish();

    if query.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, query)
    }
}

/// Produit la page complète
pub fn render_page(view: &ViewState, base: &str) -> String {
    let mut body = String::new();

    if view.phase() == Phase::SignedOut {
        let _ = write!(
            body,
            r#"<div class="signin"><a class="button" href="{}">Sign in with Google</a></div>"#,
            SIGNIN_PATH
        );
    } else {
        render_header(&mut body);
        render_search(&mut body, view, base);

        if let Some(error) = &view.error {
            let _ = write!(body, r#"<div class="error">{}</div>"#, encode_minimal(error));
        }
        if view.loading {
            body.push_str(r#"<div class="loader">Loading...</div>"#);
        }

        body.push_str(r#"<div class="panels">"#);
        render_playlists(&mut body, view, base);
        if view.selected_playlist.is_some() {
            render_items(&mut body, &view.items);
        }
        body.push_str("</div>");
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "<link rel=\"stylesheet\" href=\"{css}\">\n",
            "</head>\n",
            "<body>\n<main>{body}</main>\n</body>\n",
            "</html>\n"
        ),
        title = PAGE_TITLE,
        css = STYLESHEET_PATH,
        body = body
    )
}

fn render_header(out: &mut String) {
    let _ = write!(
        out,
        concat!(
            r#"<header><h1>{}</h1>"#,
            r#"<form method="post" action="{}"><button type="submit">Sign Out</button></form>"#,
            "</header>"
        ),
        PAGE_TITLE, SIGNOUT_PATH
    );
}

fn render_search(out: &mut String, view: &ViewState, base: &str) {
    let _ = write!(
        out,
        concat!(
            r#"<form class="search" method="get" action="{}">"#,
            r#"<input type="text" name="channel" placeholder="Enter YouTube Channel ID" value="{}">"#,
            r#"<button type="submit">Search</button>"#,
            "</form>"
        ),
        encode_minimal(base),
        encode_minimal(&view.channel_id)
    );

    if view.search_mode {
        let _ = write!(
            out,
            r#"<a class="button" href="{}">Show My Playlists</a>"#,
            encode_minimal(base)
        );
    }
}

fn render_playlists(out: &mut String, view: &ViewState, base: &str) {
    let heading = if view.search_mode {
        "Channel Playlists"
    } else {
        "Your Playlists"
    };
    let channel = view.search_mode.then_some(view.channel_id.as_str());

    let _ = write!(out, r#"<section class="playlists"><h2>{}</h2><ul>"#, heading);
    for playlist in &view.playlists {
        let selected = view.selected_playlist.as_deref() == Some(playlist.id.as_str());
        render_playlist_entry(out, playlist, &view_link(base, channel, Some(&playlist.id)), selected);
    }
    out.push_str("</ul></section>");
}

fn render_playlist_entry(out: &mut String, playlist: &Playlist, href: &str, selected: bool) {
    let class = if selected { r#" class="selected""# } else { "" };
    let _ = write!(
        out,
        r#"<li{}><a href="{}"><span class="title">{}</span><span class="count">{} videos</span></a></li>"#,
        class,
        encode_minimal(href),
        encode_minimal(playlist.display_title()),
        playlist.item_count.unwrap_or(0)
    );
}

fn render_items(out: &mut String, items: &[PlaylistItem]) {
    out.push_str(r#"<section class="items"><h2>Playlist Items</h2><ul>"#);
    for item in items {
        out.push_str("<li>");
        if let Some(thumb) = item.thumbnails.as_ref().and_then(|t| t.default.as_ref()) {
            let _ = write!(
                out,
                r#"<img src="{}" width="{}" height="{}" alt="{}">"#,
                encode_minimal(&thumb.url),
                thumb.width,
                thumb.height,
                encode_minimal(item.display_title())
            );
        }
        let _ = write!(
            out,
            r#"<div><h3>{}</h3><p>{}</p></div>"#,
            encode_minimal(item.display_title()),
            encode_minimal(item.description.as_deref().unwrap_or_default())
        );
        out.push_str("</li>");
    }
    out.push_str("</ul></section>");
}
