//! DOM view: score header, card grid and the reader's footer.
//!
//! The view is redrawn from `SessionState` after every session event. The
//! grid is rebuilt only when a new round is dealt; card buttons carry the id
//! of the round they were built for, so a click that races a new deal is
//! rejected by the session.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, MouseEvent};

use crate::poems::FALLBACK_IMAGE;
use crate::round::{CardStatus, RoundId};
use crate::session::SessionState;

const ROOT_ID: &str = "karuta-root";

pub struct View {
    doc: Document,
    score: Element,
    grid: Element,
    caption: Element,
    play: Element,
    cards: Vec<CardView>,
    listeners: Vec<Closure<dyn FnMut(MouseEvent)>>,
    rendered_round: Option<RoundId>,
    speech_available: bool,
}

struct CardView {
    button: Element,
    overlay: Element,
}

impl View {
    /// Build the page skeleton, replacing one left by an earlier start.
    pub fn mount(doc: &Document, speech_available: bool) -> Result<Self, JsValue> {
        if let Some(old) = doc.get_element_by_id(ROOT_ID) {
            old.remove();
        }
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

        let root = doc.create_element("div")?;
        root.set_id(ROOT_ID);
        root.set_attribute("style", "min-height:100vh; display:grid; grid-template-rows:auto 1fr auto; font-family:sans-serif; background:#f3f4f6; color:#1f2937;")?;

        let header = doc.create_element("header")?;
        header.set_attribute("style", "display:flex; justify-content:space-between; align-items:center; padding:4px 8px;")?;
        let title = doc.create_element("h1")?;
        title.set_text_content(Some("かるた"));
        title.set_attribute("style", "font-size:22px; font-weight:bold; color:#374151;")?;
        let score_box = doc.create_element("div")?;
        score_box.set_attribute("style", "font-size:18px; font-weight:600; background:#fff; padding:6px 14px; border-radius:8px; box-shadow:0 1px 3px rgba(0,0,0,0.2);")?;
        score_box.set_text_content(Some("もらった枚数: "));
        let score = doc.create_element("span")?;
        score.set_attribute("style", "font-size:26px; font-weight:bold; color:#16a34a;")?;
        score.set_text_content(Some("0"));
        score_box.append_child(&score)?;
        header.append_child(&title)?;
        header.append_child(&score_box)?;

        let grid = doc.create_element("main")?;
        grid.set_attribute("style", "max-width:768px; width:100%; margin:0 auto; display:grid; grid-template-columns:repeat(auto-fit, minmax(140px, 1fr)); gap:12px; padding:8px; box-sizing:border-box;")?;

        let footer = doc.create_element("footer")?;
        footer.set_attribute("style", "background:#111827; color:#fff; padding:12px; display:flex; justify-content:center; align-items:center; gap:16px;")?;
        let caption = doc.create_element("div")?;
        caption.set_attribute("style", "flex-grow:1; max-width:640px; overflow:hidden; white-space:nowrap; font-size:18px;")?;
        let play = doc.create_element("button")?;
        play.set_attribute("type", "button")?;
        play.set_attribute("style", "flex-shrink:0; width:56px; height:56px; border-radius:50%; border:none; background:#2563eb; color:#fff; font-size:22px; cursor:pointer;")?;
        footer.append_child(&caption)?;
        footer.append_child(&play)?;

        let play_listener = Closure::wrap(Box::new(move |_evt: MouseEvent| {
            super::dispatch(|s| s.toggle_playback());
        }) as Box<dyn FnMut(_)>);
        play.add_event_listener_with_callback("click", play_listener.as_ref().unchecked_ref())?;
        play_listener.forget();

        root.append_child(&header)?;
        root.append_child(&grid)?;
        root.append_child(&footer)?;
        body.append_child(&root)?;

        Ok(Self {
            doc: doc.clone(),
            score,
            grid,
            caption,
            play,
            cards: Vec::new(),
            listeners: Vec::new(),
            rendered_round: None,
            speech_available,
        })
    }

    pub fn render(&mut self, state: &SessionState) {
        if self.rendered_round != Some(state.round.id()) {
            if let Err(err) = self.rebuild_grid(state) {
                log::error!("failed to build card grid: {err:?}");
                return;
            }
        }

        self.score
            .set_text_content(Some(&state.score.value().to_string()));
        self.caption.set_text_content(Some(&state.round.caption()));

        let locked = state.round.is_locked();
        for (card, status) in self.cards.iter().zip(state.round.statuses()) {
            let (border, overlay_style, label) = match status {
                CardStatus::Untouched => ("#d1d5db", "display:none;", ""),
                CardStatus::Matched => ("#22c55e", "display:flex; background:rgba(34,197,94,0.7);", "正解！"),
                CardStatus::Mismatched => ("#ef4444", "display:flex; background:rgba(239,68,68,0.7);", "お手つき"),
            };
            let cursor = if locked { "not-allowed" } else { "pointer" };
            card.button
                .set_attribute(
                    "style",
                    &format!("position:relative; aspect-ratio:52/73; width:100%; padding:0; border:4px solid {border}; border-radius:12px; overflow:hidden; cursor:{cursor}; background:#fff;"),
                )
                .ok();
            card.overlay
                .set_attribute(
                    "style",
                    &format!("position:absolute; inset:0; align-items:center; justify-content:center; color:#fff; font-size:32px; font-weight:bold; {overlay_style}"),
                )
                .ok();
            card.overlay.set_text_content(Some(label));
            if locked {
                card.button.set_attribute("disabled", "").ok();
            } else {
                card.button.remove_attribute("disabled").ok();
            }
        }

        let (icon, label) = if state.announcing {
            ("■", "停止")
        } else {
            ("▶", "再生")
        };
        self.play.set_text_content(Some(icon));
        self.play.set_attribute("aria-label", label).ok();
        if !self.speech_available {
            self.play
                .set_attribute("title", "このブラウザは音声読み上げに対応していません")
                .ok();
        }
    }

    fn rebuild_grid(&mut self, state: &SessionState) -> Result<(), JsValue> {
        self.grid.set_inner_html("");
        self.cards.clear();
        // Old buttons are detached above, so their listeners can go.
        self.listeners.clear();

        let round = state.round.id();
        for (position, poem) in state.round.cards().iter().enumerate() {
            let button = self.doc.create_element("button")?;
            button.set_attribute("type", "button")?;
            button.set_attribute("data-poem-id", &poem.id.to_string())?;

            let img = self.doc.create_element("img")?;
            img.set_attribute("src", poem.image.as_deref().unwrap_or(FALLBACK_IMAGE))?;
            img.set_attribute(
                "alt",
                &format!("かるた {}", poem.full_text()),
            )?;
            img.set_attribute(
                "onerror",
                &format!("this.onerror=null;this.src='{FALLBACK_IMAGE}';"),
            )?;
            img.set_attribute("style", "width:100%; height:100%; object-fit:cover;")?;

            let overlay = self.doc.create_element("div")?;
            button.append_child(&img)?;
            button.append_child(&overlay)?;

            let listener = Closure::wrap(Box::new(move |_evt: MouseEvent| {
                super::dispatch(move |s| {
                    s.on_card_click_for(round, position);
                });
            }) as Box<dyn FnMut(_)>);
            button.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;

            self.grid.append_child(&button)?;
            self.listeners.push(listener);
            self.cards.push(CardView { button, overlay });
        }
        self.rendered_round = Some(round);
        Ok(())
    }
}
