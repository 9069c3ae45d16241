use crate::{
    error::{Error, Result},
    model::{Metric, Reading, ReadingsTable},
    window::Window,
};

/// Most recent reading of a window.
pub fn latest(window: Window<'_>) -> Result<Reading> {
    window
        .last()
        .copied()
        .ok_or_else(|| Error::Computation("No readings in the selected window".to_string()))
}

/// Pearson correlation of two equally long series.
///
/// Pairs where either side is NaN are skipped. Returns NaN when fewer than two
/// pairs remain or when either series is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();

    if pairs.len() < 2
        || is_constant(pairs.iter().map(|(x, _)| *x))
        || is_constant(pairs.iter().map(|(_, y)| *y))
    {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }

    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// True when every value equals the first. A `sum / n` mean of a repeated
/// inexact value (0.1, 3.6) is not exactly that value, so the deviation sums
/// alone cannot detect this.
fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Pairwise correlations between the three metrics, in [`Metric::all`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationMatrix {
    values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    pub fn metrics(&self) -> [Metric; 3] {
        Metric::all()
    }

    pub fn get(&self, row: Metric, col: Metric) -> f64 {
        self.values[index(row)][index(col)]
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.values
    }
}

fn index(metric: Metric) -> usize {
    match metric {
        Metric::Temperature => 0,
        Metric::Humidity => 1,
        Metric::WindSpeed => 2,
    }
}

/// Correlation matrix over the full table, independent of any window.
pub fn correlate(table: &ReadingsTable) -> Result<CorrelationMatrix> {
    if table.is_empty() {
        return Err(Error::Computation(
            "Cannot correlate an empty readings table".to_string(),
        ));
    }

    let columns = Metric::all().map(|m| table.column(m));
    let mut values = [[f64::NAN; 3]; 3];

    for i in 0..3 {
        for j in i..3 {
            let r = pearson(&columns[i], &columns[j]);
            // A non-constant column correlates perfectly with itself.
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { values })
}
