//! Filler text.

use crate::context::GenerationContext;
use crate::error::{GenerationError, RegistryError};
use crate::generators::{ArgReader, ValueGenerator};
use crate::registry::Registry;
use faker_rand::lorem::{
    Paragraph as FakeParagraph, Sentence as FakeSentence, Word as FakeWord,
};
use rand::Rng;
use serde_json::Value;

fn sentence_of(ctx: &mut GenerationContext, words: usize) -> String {
    let mut text = (0..words.max(1))
        .map(|_| ctx.rng().gen::<FakeWord>().to_string())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = text.chars().next() {
        let upper = first.to_uppercase().to_string();
        text.replace_range(..first.len_utf8(), &upper);
    }
    text.push('.');
    text
}

/// `word()`
pub struct Word;

impl ValueGenerator for Word {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        Ok(Value::String(ctx.rng().gen::<FakeWord>().to_string()))
    }
}

/// `sentence(words)`
pub struct Sentence;

impl ValueGenerator for Sentence {
    fn generate(
        &self,
        args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let text = match args.u64_or("words", 0, 0)? {
            0 => ctx.rng().gen::<FakeSentence>().to_string(),
            n => sentence_of(ctx, n as usize),
        };
        Ok(Value::String(text.trim().to_string()))
    }
}

/// `paragraph(sentences)`
pub struct Paragraph;

impl ValueGenerator for Paragraph {
    fn generate(
        &self,
        args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let text = match args.u64_or("sentences", 0, 0)? {
            0 => ctx.rng().gen::<FakeParagraph>().to_string(),
            n => (0..n)
                .map(|_| ctx.rng().gen::<FakeSentence>().to_string().trim().to_string())
                .collect::<Vec<_>>()
                .join(" "),
        };
        Ok(Value::String(text.trim().to_string()))
    }
}

pub(crate) fn install(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_custom("word", Word)?;
    registry.register_custom("sentence", Sentence)?;
    registry.register_custom("paragraph", Paragraph)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationOptions;
    use serde_json::json;
    use template_core::Args;

    fn run(generator: &dyn ValueGenerator, args: &Args) -> String {
        let mut ctx = GenerationContext::new(&GenerationOptions::default().with_seed(2));
        generator
            .generate(&ArgReader::new("test", args), &mut ctx)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_sentence_word_count() {
        let text = run(&Sentence, &Args::positional(vec![json!(5)]));
        assert_eq!(text.split(' ').count(), 5);
        assert!(text.ends_with('.'));
        assert!(text.chars().next().unwrap().is_uppercase());
    }

    #[test]
    fn test_default_sentence_and_paragraph() {
        assert!(!run(&Sentence, &Args::default()).is_empty());
        assert!(!run(&Paragraph, &Args::default()).is_empty());
    }

    #[test]
    fn test_paragraph_sentence_count() {
        let short = run(&Paragraph, &Args::positional(vec![json!(1)]));
        let long = run(&Paragraph, &Args::positional(vec![json!(4)]));
        assert!(!short.is_empty());
        assert!(long.len() > short.len());
    }

    #[test]
    fn test_word_is_single_token() {
        let text = run(&Word, &Args::default());
        assert!(!text.is_empty());
        assert!(!text.contains(' '));
    }
}
