//! `sketch curve`

use anyhow::{bail, Context, Result};
use sketch_animation::{Axis, CubicBezier, Easing};

pub struct CurveArgs {
    pub preset: Option<String>,
    pub points: Option<Vec<f64>>,
    pub samples: Option<u32>,
    pub solve_x: Option<f64>,
    pub solve_y: Option<f64>,
    pub divide_t: Option<f64>,
    pub epsilon: f64,
}

/// Resolve the curve named on the command line.
fn resolve(preset: Option<&str>, points: Option<&[f64]>) -> Result<CubicBezier> {
    match (preset, points) {
        (Some(name), _) => {
            let easing: Easing = name.parse()?;
            easing
                .curve()
                .with_context(|| format!("`{name}` is not a bezier timing curve"))
        }
        (None, Some(&[p1x, p1y, p2x, p2y])) => Ok(CubicBezier::new(p1x, p1y, p2x, p2y)?),
        (None, Some(other)) => bail!("expected 4 control points, got {}", other.len()),
        (None, None) => Ok(CubicBezier::ease()),
    }
}

pub fn cmd_curve(args: CurveArgs) -> Result<()> {
    let curve = resolve(args.preset.as_deref(), args.points.as_deref())?;
    println!("{curve}");

    let mut did_something = false;

    if let Some(samples) = args.samples {
        if samples == 0 {
            bail!("--samples must be at least 1");
        }
        println!("{:>8} {:>10} {:>10}", "t", "x", "y");
        for i in 0..=samples {
            let t = i as f64 / samples as f64;
            let p = curve.evaluate(t)?;
            println!("{t:>8.4} {:>10.6} {:>10.6}", p.x, p.y);
        }
        did_something = true;
    }

    for (axis, value) in [(Axis::X, args.solve_x), (Axis::Y, args.solve_y)] {
        let Some(value) = value else { continue };
        let t = curve.solve_t(value, axis, args.epsilon)?;
        let p = curve.evaluate(t)?;
        println!("{axis:?} = {value}: t = {t:.9} -> ({:.9}, {:.9})", p.x, p.y);
        did_something = true;
    }

    if let Some(t) = args.divide_t {
        let (left, right) = curve.divide_at_t(t)?;
        println!("left:  {left}");
        println!("right: {right}");
        did_something = true;
    }

    if !did_something {
        let (p1x, p1y, p2x, p2y) = curve.control_points();
        println!("p1 = ({p1x}, {p1y})");
        println!("p2 = ({p2x}, {p2y})");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_preset() {
        let curve = resolve(Some("ease-in"), None).unwrap();
        assert_eq!(curve, CubicBezier::ease_in());
    }

    #[test]
    fn test_resolve_points() {
        let curve = resolve(None, Some(&[0.1, 0.2, 0.3, 0.4][..])).unwrap();
        assert_eq!(curve.control_points(), (0.1, 0.2, 0.3, 0.4));
    }

    #[test]
    fn test_resolve_rejects() {
        assert!(resolve(Some("ease-in-quad"), None).is_err());
        assert!(resolve(Some("wobble"), None).is_err());
        assert!(resolve(None, Some(&[0.1, 0.2][..])).is_err());
        assert!(resolve(None, Some(&[1.5, 0.0, 0.0, 0.0][..])).is_err());
    }

    #[test]
    fn test_default_is_ease() {
        assert_eq!(resolve(None, None).unwrap(), CubicBezier::ease());
    }
}
