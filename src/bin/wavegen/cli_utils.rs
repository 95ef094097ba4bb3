use bevy::math::Vec2;
use wavegrowth::game_logic::errors::{GrowthError, GrowthResult};
use wavegrowth::resources::{StrategyKind, WaveMode};
use wavegrowth::terrain::coordinates::Connectivity;

fn invalid(reason: String) -> GrowthError {
    GrowthError::InvalidConfig { reason }
}

/// Generic parser for delimited strings into fixed-size arrays
pub fn parse_delimited<const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
) -> GrowthResult<[f32; N]> {
    let parts: Vec<&str> = input.split(delimiter).map(str::trim).collect();
    if parts.len() != N {
        return Err(invalid(format!(
            "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
        )));
    }

    let mut result = [0.0; N];
    for (slot, part) in result.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| invalid(format!("Invalid {type_name} value: '{part}'")))?;
    }
    Ok(result)
}

/// Parse plateau size "WIDTHxHEIGHT" in cells
pub fn parse_size(size_str: &str) -> GrowthResult<(u32, u32)> {
    let [width, height] = parse_delimited::<2>(size_str, 'x', "size")?;
    let (width, height) = (width as u32, height as u32);

    if width == 0 || height == 0 {
        return Err(invalid("Width and height must be greater than 0".to_string()));
    }
    if width > 1024 || height > 1024 {
        return Err(invalid("Width and height must not exceed 1024".to_string()));
    }
    Ok((width, height))
}

/// Parse position string "X,Y"
pub fn parse_position(pos_str: &str) -> GrowthResult<Vec2> {
    let [x, y] = parse_delimited::<2>(pos_str, ',', "position")?;
    Ok(Vec2::new(x, y))
}

/// Accepts "4", "8", "four" or "eight"
pub fn parse_connectivity(value: &str) -> GrowthResult<Connectivity> {
    match value.trim().to_ascii_lowercase().as_str() {
        "four" => Ok(Connectivity::Four),
        "eight" => Ok(Connectivity::Eight),
        other => other
            .parse()
            .ok()
            .and_then(Connectivity::from_neighbor_count)
            .ok_or_else(|| invalid(format!("Unknown connectivity '{value}', use 4 or 8"))),
    }
}

pub fn parse_strategy(value: &str) -> GrowthResult<StrategyKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "grid" => Ok(StrategyKind::Grid),
        "polygon" | "poly" => Ok(StrategyKind::Polygon),
        _ => Err(invalid(format!(
            "Unknown strategy '{value}', use grid or polygon"
        ))),
    }
}

pub fn parse_mode(value: &str) -> GrowthResult<WaveMode> {
    match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
        "population" | "props" => Ok(WaveMode::Population),
        "combat_preparation" | "combat" | "enemies" => Ok(WaveMode::CombatPreparation),
        "both" => Ok(WaveMode::Both),
        _ => Err(invalid(format!(
            "Unknown mode '{value}', use population, combat or both"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("8x8").unwrap(), (8, 8));
        assert_eq!(parse_size("16x4").unwrap(), (16, 4));

        assert!(parse_size("8").is_err());
        assert!(parse_size("0x8").is_err());
        assert!(parse_size("2000x8").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1.5,-2").unwrap(), Vec2::new(1.5, -2.0));
        assert_eq!(parse_position(" 3 , 4 ").unwrap(), Vec2::new(3.0, 4.0));
        assert!(parse_position("1,2,3").is_err());
        assert!(parse_position("x,y").is_err());
    }

    #[test]
    fn test_parse_connectivity() {
        assert_eq!(parse_connectivity("4").unwrap(), Connectivity::Four);
        assert_eq!(parse_connectivity("Eight").unwrap(), Connectivity::Eight);
        assert!(parse_connectivity("6").is_err());
        assert!(parse_connectivity("many").is_err());
    }

    #[test]
    fn test_parse_strategy_and_mode() {
        assert_eq!(parse_strategy("polygon").unwrap(), StrategyKind::Polygon);
        assert!(parse_strategy("hex").is_err());
        assert_eq!(
            parse_mode("combat-preparation").unwrap(),
            WaveMode::CombatPreparation
        );
        assert_eq!(parse_mode("props").unwrap(), WaveMode::Population);
        assert!(parse_mode("idle").is_err());
    }
}
