//! Person-shaped values.

use crate::context::GenerationContext;
use crate::error::{GenerationError, RegistryError};
use crate::generators::{ArgReader, ValueGenerator};
use crate::registry::Registry;
use faker_rand::en_us::internet::{Email as FakeEmail, Username as FakeUsername};
use faker_rand::en_us::names::{FirstName as FakeFirstName, LastName as FakeLastName};
use rand::Rng;
use serde_json::Value;

/// `first_name()`
pub struct FirstName;

impl ValueGenerator for FirstName {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        Ok(Value::String(ctx.rng().gen::<FakeFirstName>().to_string()))
    }
}

/// `last_name()`
pub struct LastName;

impl ValueGenerator for LastName {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        Ok(Value::String(ctx.rng().gen::<FakeLastName>().to_string()))
    }
}

/// `full_name()`
pub struct FullName;

impl ValueGenerator for FullName {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let first = ctx.rng().gen::<FakeFirstName>();
        let last = ctx.rng().gen::<FakeLastName>();
        Ok(Value::String(format!("{first} {last}")))
    }
}

/// `email(domain)`
///
/// With a `domain` argument the local part is kept and the domain replaced.
pub struct Email;

impl ValueGenerator for Email {
    fn generate(
        &self,
        args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let email = ctx.rng().gen::<FakeEmail>().to_string();
        let email = match args.str("domain", 0)? {
            Some(domain) => {
                let local = email.split('@').next().unwrap_or_default();
                format!("{local}@{domain}")
            }
            None => email,
        };
        Ok(Value::String(email))
    }
}

/// `username()`
pub struct Username;

impl ValueGenerator for Username {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        Ok(Value::String(ctx.rng().gen::<FakeUsername>().to_string()))
    }
}

pub(crate) fn install(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_custom("first_name", FirstName)?;
    registry.register_custom("last_name", LastName)?;
    registry.register_custom("full_name", FullName)?;
    registry.register_custom("email", Email)?;
    registry.register_custom("username", Username)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenerationOptions;
    use serde_json::json;
    use template_core::Args;

    fn run_seeded(generator: &dyn ValueGenerator, args: &Args, seed: u64) -> String {
        let mut ctx = GenerationContext::new(&GenerationOptions::default().with_seed(seed));
        generator
            .generate(&ArgReader::new("test", args), &mut ctx)
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    fn run(generator: &dyn ValueGenerator, args: &Args) -> String {
        run_seeded(generator, args, 5)
    }

    #[test]
    fn test_full_name_has_first_and_last() {
        let name = run(&FullName, &Args::default());
        assert!(name.split_whitespace().count() >= 2, "got {name:?}");
    }

    #[test]
    fn test_names_are_seeded() {
        for generator in [&FirstName as &dyn ValueGenerator, &LastName, &Username] {
            let a = run_seeded(generator, &Args::default(), 9);
            let b = run_seeded(generator, &Args::default(), 9);
            assert!(!a.is_empty());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_email_shape() {
        let email = run(&Email, &Args::default());
        assert_eq!(email.matches('@').count(), 1, "got {email:?}");
    }

    #[test]
    fn test_email_domain_argument() {
        let args = Args::positional(vec![json!("corp.test")]);
        let email = run(&Email, &args);
        assert!(email.ends_with("@corp.test"));
        assert!(!email.starts_with('@'));
    }
}
