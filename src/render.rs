// src/render.rs

//! The presentation seam.
//!
//! The engine hands a [`Renderer`] one [`View`] at a time; rendering
//! replaces whatever was displayed before and reports nothing back.
//! Reload intents arrive out of band as plain method calls on the kiosk.

use crate::models::{Card, View};

/// Something that can display a view.
pub trait Renderer: Send {
    fn render(&mut self, view: &View);
}

/// Plain-text renderer for the CLI.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    fn print_card(card: &Card) {
        if let Some(kicker) = &card.kicker {
            println!("[{kicker}]");
        }
        if let Some(headline) = &card.headline {
            println!("{headline}");
        }
        if let Some(body) = &card.body {
            if card.italic_body {
                println!("  {body}");
            } else {
                println!("{body}");
            }
        }
        if let Some(meta) = &card.meta {
            println!("— {meta}");
        }
        if let Some(link) = &card.link {
            println!("→ {link}");
        }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&mut self, view: &View) {
        println!();
        println!("────────────────────────────────────────");
        match view {
            View::Intro { app_name } => {
                println!("{app_name}");
            }
            View::Card(card) => Self::print_card(card),
            View::Holiday {
                kicker,
                date_line,
                title,
            } => {
                println!("[{kicker}]");
                println!("{date_line}");
                println!("{title}");
            }
            View::Events {
                kicker,
                headline,
                items,
                empty_body,
            } => {
                println!("[{kicker}]");
                println!("{headline}");
                for (year, description) in items {
                    println!("  {year}  {description}");
                }
                if let Some(body) = empty_body {
                    println!("{body}");
                }
            }
            View::Unavailable {
                kicker,
                headline,
                body,
            } => {
                println!("[{kicker}]");
                println!("{headline}");
                println!("{body}");
            }
        }
        println!("────────────────────────────────────────");
    }
}

/// Renderer that records every view it is handed. Used by tests and
/// useful for embedders that drive their own display.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    views: Vec<View>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn last(&self) -> Option<&View> {
        self.views.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &View) {
        self.views.push(view.clone());
    }
}
