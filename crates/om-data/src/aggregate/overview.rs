use om_core::CountryTotal;
use super::DisciplineCell;

/// Min and max `total` over every country, for the overview color scale.
/// Independent of the selection; `None` when there are no countries.
pub fn overview_color_domain(totals: &[CountryTotal]) -> Option<(u32, u32)> {
    let min = totals.iter().map(|t| t.total).min()?;
    let max = totals.iter().map(|t| t.total).max()?;
    Some((min, max))
}

/// Count range of the detail matrix; `(0, 0)` when empty
pub fn cell_count_domain(cells: &[DisciplineCell]) -> (u32, u32) {
    let min = cells.iter().map(|c| c.count).min().unwrap_or(0);
    let max = cells.iter().map(|c| c.count).max().unwrap_or(0);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(code: &str, total: u32) -> CountryTotal {
        CountryTotal {
            country_code: code.to_string(),
            country_name: code.to_string(),
            gold: 0,
            silver: 0,
            bronze: 0,
            total,
        }
    }

    #[test]
    fn test_color_domain() {
        let totals = vec![total("USA", 126), total("FRA", 64), total("ALB", 2)];
        assert_eq!(overview_color_domain(&totals), Some((2, 126)));
        assert_eq!(overview_color_domain(&[]), None);
    }
}
