//! Network-shaped values.

use crate::context::GenerationContext;
use crate::error::{GenerationError, RegistryError};
use crate::generators::string::{generate_random_string, Charset};
use crate::generators::{ArgReader, ValueGenerator};
use crate::registry::Registry;
use faker_rand::en_us::internet::Domain as FakeDomain;
use rand::Rng;
use serde_json::Value;

/// `ipv4()`
pub struct Ipv4;

impl ValueGenerator for Ipv4 {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let octets: [u8; 4] = ctx.rng().gen();
        Ok(Value::String(std::net::Ipv4Addr::from(octets).to_string()))
    }
}

/// `mac_address()`
pub struct MacAddress;

impl ValueGenerator for MacAddress {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let bytes: [u8; 6] = ctx.rng().gen();
        let text = bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":");
        Ok(Value::String(text))
    }
}

fn random_domain(ctx: &mut GenerationContext) -> String {
    ctx.rng().gen::<FakeDomain>().to_string()
}

/// `domain()`
pub struct Domain;

impl ValueGenerator for Domain {
    fn generate(
        &self,
        _args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        Ok(Value::String(random_domain(ctx)))
    }
}

/// `url(scheme)`
pub struct Url;

impl ValueGenerator for Url {
    fn generate(
        &self,
        args: &ArgReader<'_>,
        ctx: &mut GenerationContext,
    ) -> Result<Value, GenerationError> {
        let scheme = args.str("scheme", 0)?.unwrap_or("https");
        let domain = random_domain(ctx);
        let length = ctx.rng().gen_range(3..=12);
        let path = generate_random_string(ctx.rng(), length, &Charset::Lower);
        Ok(Value::String(format!("{scheme}://{domain}/{path}")))
    }
}

pub(crate) fn install(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_custom("ipv4", Ipv4)?;
    registry.register_custom("mac_address", MacAddress)?;
    registry.register_custom("domain", Domain)?;
    registry.register_custom("url", Url)?;
    Ok(())
}
