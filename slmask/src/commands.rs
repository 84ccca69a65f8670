//! CLI command implementations.

use std::sync::Arc;

use serde_json::Value;
use softlayer::{
    merge_masks, parse_mask, CallRequest, Client, Config, Error, MaskLiteral, MaskProperty,
    ObjectFilter, Transport,
};

/// Transport that sends nothing and answers with the request itself.
struct DryRun;

impl Transport for DryRun {
    fn call(&self, request: &CallRequest) -> softlayer::Result<Value> {
        Ok(serde_json::to_value(request)?)
    }
}

/// Per-call options for `slmask request`.
pub struct RequestOptions<'a> {
    pub id: Option<&'a str>,
    pub masks: &'a [String],
    /// (offset, limit)
    pub window: Option<(i64, i64)>,
    pub filter: Option<&'a str>,
}

pub fn parse(mask: &str, tree: bool) -> softlayer::Result<()> {
    let parsed = parse_mask(mask)?;
    if tree {
        for root in parsed.roots() {
            print_tree(root, 0);
        }
    } else {
        println!("{}", parsed);
    }
    Ok(())
}

fn print_tree(property: &MaskProperty, depth: usize) {
    let indent = "  ".repeat(depth);
    match property.type_name() {
        Some(type_name) => println!("{}{} ({})", indent, property.name(), type_name),
        None => println!("{}{}", indent, property.name()),
    }
    for child in property.children() {
        print_tree(child, depth + 1);
    }
}

pub fn merge(masks: &[String]) -> softlayer::Result<()> {
    println!("{}", merge_masks(masks)?);
    Ok(())
}

pub fn flatten(json: &str) -> softlayer::Result<()> {
    let literal = MaskLiteral::try_from(serde_json::from_str::<Value>(json)?)?;
    let rendered = literal.to_mask_string()?;
    if rendered.is_empty() {
        return Err(Error::InvalidArgument("mask literal is empty".to_string()));
    }
    println!("{}", rendered);
    Ok(())
}

/// JSON if it parses as JSON, otherwise a plain string.
fn json_or_string(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub fn request(service: &str, method: &str, options: &RequestOptions<'_>, args: &[String]) -> softlayer::Result<()> {
    let client = Client::new(Config::load()?, Arc::new(DryRun));
    let service = client.service(service);

    let mut filter = service.filter();
    if let Some(id) = options.id {
        filter = filter.with_object_id(json_or_string(id))?;
    }
    if !options.masks.is_empty() {
        filter = filter.with_object_mask(options.masks)?;
    }
    if let Some((offset, limit)) = options.window {
        filter = filter.with_result_window(offset, limit);
    }
    if let Some(object_filter) = options.filter {
        filter = filter.with_object_filter(ObjectFilter::try_from(serde_json::from_str::<Value>(object_filter)?)?);
    }

    let args = args.iter().map(|arg| json_or_string(arg)).collect();
    let request = filter.invoke(method, args)?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

pub fn config() -> softlayer::Result<()> {
    let config = Config::load()?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    print!("{}", rendered);
    Ok(())
}
