//! Cross-field reference generator.

use super::ArgReader;
use crate::context::GenerationContext;
use crate::error::GenerationError;
use serde_json::Value;

/// `ref(path)`: re-emit a value produced earlier in the same document.
pub(crate) fn generate_reference(
    args: &ArgReader<'_>,
    ctx: &mut GenerationContext,
) -> Result<Value, GenerationError> {
    let path = args.required_str("path", 0)?;
    ctx.lookup(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GenerationOptions, ReferenceTargets};
    use serde_json::json;
    use template_core::{Args, Path};

    #[test]
    fn test_reference_to_recorded_value() {
        let targets = ReferenceTargets {
            absolute: ["user.id".to_string()].into_iter().collect(),
            relative: false,
        };
        let mut ctx = GenerationContext::new(&GenerationOptions::default()).with_targets(targets);
        ctx.record(&Path::parse("user.id").unwrap(), &json!(17));

        let args = Args::positional(vec![json!("user.id")]);
        let value = generate_reference(&ArgReader::new("ref", &args), &mut ctx).unwrap();
        assert_eq!(value, json!(17));
    }

    #[test]
    fn test_forward_reference_fails() {
        let mut ctx = GenerationContext::new(&GenerationOptions::default());
        let args = Args::positional(vec![json!("later.field")]);

        assert!(matches!(
            generate_reference(&ArgReader::new("ref", &args), &mut ctx),
            Err(GenerationError::UnresolvedReference(path)) if path == "later.field"
        ));
    }

    #[test]
    fn test_missing_path_argument() {
        let mut ctx = GenerationContext::new(&GenerationOptions::default());
        assert!(matches!(
            generate_reference(&ArgReader::new("ref", &Args::default()), &mut ctx),
            Err(GenerationError::InvalidArgument { .. })
        ));
    }
}
