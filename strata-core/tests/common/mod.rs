//! Shared fixtures for the integration tests.
//!
//! `TextStates` holds the descriptors of the demo app (two text atoms, a
//! character count, the count doubled, and both texts joined by a dash).
//! A click counter and its label sit next to them and are read by none of
//! the demo components. All of them are built once per process and shared
//! by every test and every scope, the way application code declares them at
//! module level.
//!
//! `App` mounts a small component tree against those descriptors. Each
//! component owns a binding whose callback only marks the component dirty;
//! `App::flush` then re-renders dirty components in tree order and reports
//! which ones rendered.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use strata_core::{
    atom, selector, AsDescriptor, Atom, Binding, Getter, Result, Selector, SetContext, Value,
    ValueSetter,
};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TextStates {
    pub text1: Atom<String>,
    pub text2: Atom<String>,
    pub char_count: Selector<usize>,
    pub char_count_by_two: Selector<usize>,
    pub both: Selector<String>,
    pub clicks: Atom<u32>,
    pub clicks_label: Selector<String>,
}

pub fn states() -> &'static TextStates {
    static STATES: OnceLock<TextStates> = OnceLock::new();
    STATES.get_or_init(TextStates::new)
}

impl TextStates {
    fn new() -> Self {
        let text1 = atom("textState1", String::new());
        let text2 = atom("textState2", String::new());

        let char_count = selector("charCountState", {
            let text1 = text1.clone();
            move |ctx: &Getter<'_>| Ok(ctx.get(&text1)?.chars().count())
        });

        let char_count_by_two = selector("charCountStateByTwo", {
            let char_count = char_count.clone();
            move |ctx: &Getter<'_>| Ok(ctx.get(&char_count)? * 2)
        });

        let both = selector("bothTextsState", {
            let (text1, text2) = (text1.clone(), text2.clone());
            move |ctx: &Getter<'_>| Ok(format!("{}-{}", ctx.get(&text1)?, ctx.get(&text2)?))
        })
        .with_set({
            let (text1, text2) = (text1.clone(), text2.clone());
            move |ctx: &SetContext, next: String| {
                let parts: Vec<&str> = next.split('-').collect();
                let [first, second] = parts.as_slice() else {
                    return Ok(());
                };
                ctx.set(&text1, first.to_string())?;
                ctx.set(&text2, second.to_string())
            }
        });

        let clicks = atom("clickCount", 0u32);
        let clicks_label = selector("clickCountLabel", {
            let clicks = clicks.clone();
            move |ctx: &Getter<'_>| Ok(format!("{} clicks", ctx.get(&clicks)?))
        });

        Self {
            text1,
            text2,
            char_count,
            char_count_by_two,
            both,
            clicks,
            clicks_label,
        }
    }
}

pub trait Component {
    fn name(&self) -> &'static str;
    fn is_dirty(&self) -> bool;
    fn render(&mut self) -> Result<()>;
    fn text(&self) -> &str;
}

pub struct View<T: Value> {
    name: &'static str,
    binding: Binding<T>,
    dirty: Arc<AtomicBool>,
    format: fn(&T) -> String,
    text: String,
}

impl<T: Value> View<T> {
    pub fn mount<D>(name: &'static str, descriptor: &D, format: fn(&T) -> String) -> Result<Self>
    where
        D: AsDescriptor<Output = T>,
    {
        let dirty = Arc::new(AtomicBool::new(false));
        let flag = dirty.clone();
        let binding = Binding::new(descriptor, move || flag.store(true, Ordering::SeqCst))?;

        let mut view = Self {
            name,
            binding,
            dirty,
            format,
            text: String::new(),
        };
        view.render()?;
        Ok(view)
    }

    pub fn setter(&self) -> ValueSetter<T> {
        self.binding.setter()
    }
}

impl<T: Value> Component for View<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn render(&mut self) -> Result<()> {
        self.dirty.store(false, Ordering::SeqCst);
        let value = self.binding.bind()?;
        self.text = (self.format)(&value);
        Ok(())
    }

    fn text(&self) -> &str {
        &self.text
    }
}

/// The demo component tree, mounted in the ambient scope.
pub struct App {
    components: Vec<Box<dyn Component>>,
    pub set_text1: ValueSetter<String>,
    pub set_text2: ValueSetter<String>,
    pub set_both: ValueSetter<String>,
}

impl App {
    pub fn mount() -> Result<Self> {
        let s = states();

        let text_input = View::mount("TextInput", &s.text1, |v: &String| v.clone())?;
        let echo = View::mount("EchoInput", &s.text1, |v: &String| {
            format!("Echoing textState1: {v}")
        })?;
        let text_input2 = View::mount("TextInput2", &s.text2, |v: &String| {
            format!("Echoing textState2: {v}")
        })?;
        let count = View::mount("TextState1CharacterCount", &s.char_count, |v: &usize| {
            format!("textState1 contains {v} characters")
        })?;
        let count_by_two = View::mount(
            "TextState1CharCountStateByTwo",
            &s.char_count_by_two,
            |v: &usize| format!("textState1 contains {v} characters (multiplied for two)"),
        )?;
        let texts = View::mount("Texts", &s.both, |v: &String| {
            format!("Both texts, splitted by a dash: {v}")
        })?;
        let set_texts = View::mount("SetTexts", &s.both, |_: &String| {
            String::from("Set both texts")
        })?;

        let set_text1 = text_input.setter();
        let set_text2 = text_input2.setter();
        let set_both = set_texts.setter();

        Ok(Self {
            components: vec![
                Box::new(text_input),
                Box::new(echo),
                Box::new(text_input2),
                Box::new(count),
                Box::new(count_by_two),
                Box::new(texts),
                Box::new(set_texts),
            ],
            set_text1,
            set_text2,
            set_both,
        })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Re-render every dirty component in tree order.
    pub fn flush(&mut self) -> Result<Vec<&'static str>> {
        let mut rendered = Vec::new();
        for component in &mut self.components {
            if component.is_dirty() {
                component.render()?;
                rendered.push(component.name());
            }
        }
        Ok(rendered)
    }

    pub fn has_pending(&self) -> bool {
        self.components.iter().any(|c| c.is_dirty())
    }

    pub fn text(&self, name: &str) -> &str {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.text())
            .unwrap_or_else(|| panic!("no component named {name}"))
    }
}
