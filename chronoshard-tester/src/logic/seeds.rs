use anyhow::{Context, Result, bail};

/// Seed used when the command line names none.
pub const DEFAULT_SEED: u64 = 1337;

/// Largest span a single `a..b` token may expand to.
const MAX_RANGE_SPAN: u64 = 10_000;

/// Resolve CLI seed tokens into a deduplicated list, keeping first-seen order.
///
/// Accepts integers (negative values use their magnitude) and inclusive
/// ranges written `start..end` or `start-end`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();
    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        for seed in parse_token(token)? {
            if !seeds.contains(&seed) {
                seeds.push(seed);
            }
        }
    }
    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_token(token: &str) -> Result<Vec<u64>> {
    if let Some((start, end)) = token.split_once("..").or_else(|| token.split_once('-'))
        && !start.is_empty()
    {
        let start = parse_seed(start)?;
        let end = parse_seed(end.trim_start_matches('='))?;
        if end < start {
            bail!("seed range {token} runs backwards");
        }
        if end - start >= MAX_RANGE_SPAN {
            bail!("seed range {token} is wider than {MAX_RANGE_SPAN}");
        }
        return Ok((start..=end).collect());
    }
    Ok(vec![parse_seed(token)?])
}

fn parse_seed(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    let value = raw
        .parse::<i64>()
        .with_context(|| format!("invalid seed {raw:?}"))?;
    Ok(value.unsigned_abs())
}
