//! Polygon / polyline point strings: `"x0,y0 x1,y1 ..."`.

use crate::error::DecodeError;
use crate::model::Point;

pub fn decode_points(s: &str) -> Result<Vec<Point>, DecodeError> {
    s.split_whitespace().map(decode_point).collect()
}

fn decode_point(pair: &str) -> Result<Point, DecodeError> {
    let malformed = || DecodeError::MalformedPoint(pair.to_string());

    let (x, y) = pair.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse::<f32>().map_err(|_| malformed())?;
    let y = y.trim().parse::<f32>().map_err(|_| malformed())?;
    Ok(Point { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_keep_x_and_y_apart() {
        let pts = decode_points("0,0 16,-8\n 32.5,4").unwrap();
        assert_eq!(
            pts,
            vec![
                Point { x: 0.0, y: 0.0 },
                Point { x: 16.0, y: -8.0 },
                Point { x: 32.5, y: 4.0 },
            ]
        );
        assert!(decode_points("").unwrap().is_empty());
    }

    #[test]
    fn bad_pairs() {
        for bad in ["1", "1,", "a,2", "1,2,3"] {
            assert!(
                matches!(decode_points(bad), Err(DecodeError::MalformedPoint(p)) if p == bad),
                "{bad}"
            );
        }
    }
}
