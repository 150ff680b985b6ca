use anyhow::{anyhow, Result};
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

/// Run a jq filter over one document; every output becomes its own document.
pub fn select_with_jq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(describe_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(describe_undefined)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut selected = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| anyhow!("jq filter failed: {e:?}"))?;
        // Val has no direct conversion back, go through its JSON text
        let text = val.to_string();
        let value = serde_json::from_str::<Value>(&text)
            .map_err(|e| anyhow!("jq produced non-JSON output `{text}`: {e}"))?;
        selected.push(value);
    }
    Ok(selected)
}

fn describe_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let lines = errs
        .into_iter()
        .map(|(file, err)| format!("jq parse error: {err:?} in `{}`", file.code))
        .collect::<Vec<_>>();
    anyhow!(lines.join("\n"))
}

fn describe_undefined(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> anyhow::Error {
    let lines = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter().map(move |(name, undef)| {
                format!("jq undefined `{name}`: {undef:?} in `{}`", file.code)
            })
        })
        .collect::<Vec<_>>();
    anyhow!(lines.join("\n"))
}
