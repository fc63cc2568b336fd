use rescope_core::{GlobMatcher, PathMatcher};

pub fn run(path: &str, glob: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let matched = evaluate(path, glob)?;
    println!("{}", matched);
    Ok(matched)
}

fn evaluate(path: &str, glob: &str) -> Result<bool, Box<dyn std::error::Error>> {
    GlobMatcher::validate(glob).map_err(|reason| format!("invalid glob '{}': {}", glob, reason))?;
    Ok(GlobMatcher.matches(path, glob))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate() {
        assert!(evaluate("conf/env/prod.yml", "conf/**/*.yml").unwrap());
        assert!(!evaluate("conf/prod.xml", "conf/*.yml").unwrap());
        assert!(evaluate("x", "{a").is_err());
    }
}
