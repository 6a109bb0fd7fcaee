//! Path mini-language parser with arc flattening.
//!
//! Grammar (SVG path subset)
//! - `M/m x y [x y]...` (extra pairs are implicit `L/l`), `L/l x y`, `H/h x`,
//!   `V/v y`, `A/a rx ry xrot large sweep x y`, `Z/z`.
//! - Separators are whitespace and commas; arc flags may be packed (`011`).
//!
//! Output
//! - One `Contour` per sub-path, points on the fixed-point grid. The pen
//!   position is tracked in millimetres so relative commands never accumulate
//!   rounding; only emitted points are snapped.
//! - Any malformed input aborts with a `ParseError`; nothing partial escapes.
//!   Points beyond `MAX_FIXED` grid units are rejected, never clamped.

use nalgebra::Vector2;

use crate::error::ParseError;

use super::types::{try_to_fixed, Contour, GeomCfg, IPoint};

/// Parse a path description into fixed-point point runs.
pub fn parse_path(d: &str, cfg: &GeomCfg) -> Result<Vec<Contour>, ParseError> {
    PathParser::new(d, *cfg).run()
}

#[inline]
fn arity(cmd: char) -> Option<usize> {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' => Some(2),
        'H' | 'V' => Some(1),
        'A' => Some(7),
        'Z' => Some(0),
        _ => None,
    }
}

struct PathParser<'a> {
    text: &'a str,
    src: &'a [u8],
    /// Byte offset of the command being applied.
    cmd_offset: usize,
    pos: usize,
    cfg: GeomCfg,
    out: Vec<Contour>,
    current: Contour,
    pen: Vector2<f64>,
    subpath_start: Vector2<f64>,
    /// Set after `Z`: the next drawing command reopens at `subpath_start`.
    reopen: bool,
}

impl<'a> PathParser<'a> {
    fn new(d: &'a str, cfg: GeomCfg) -> Self {
        Self {
            text: d,
            src: d.as_bytes(),
            cmd_offset: 0,
            pos: 0,
            cfg,
            out: Vec::new(),
            current: Contour::default(),
            pen: Vector2::zeros(),
            subpath_start: Vector2::zeros(),
            reopen: false,
        }
    }

    fn run(mut self) -> Result<Vec<Contour>, ParseError> {
        self.skip_separators();
        if self.pos >= self.src.len() {
            return Err(ParseError::Empty);
        }
        let mut first = true;
        while self.pos < self.src.len() {
            let offset = self.pos;
            let ch = self.text[offset..].chars().next().unwrap_or('\0');
            if !ch.is_ascii_alphabetic() {
                return Err(if is_number_start(ch) {
                    ParseError::MissingMoveTo { offset }
                } else {
                    ParseError::UnexpectedChar { found: ch, offset }
                });
            }
            let n = arity(ch).ok_or(ParseError::UnknownCommand { command: ch, offset })?;
            if first && !matches!(ch, 'M' | 'm') {
                return Err(ParseError::MissingMoveTo { offset });
            }
            first = false;
            self.pos += 1;
            let groups = self.read_groups(ch, n, offset)?;
            self.cmd_offset = offset;
            self.apply(ch, &groups)?;
            self.skip_separators();
        }
        self.finish_subpath();
        Ok(self.out)
    }

    /// All argument groups following a command letter.
    fn read_groups(&mut self, cmd: char, n: usize, offset: usize) -> Result<Vec<Vec<f64>>, ParseError> {
        let mut groups = Vec::new();
        loop {
            self.skip_separators();
            if !self.at_number() {
                break;
            }
            if n == 0 {
                return Err(ParseError::BadArgumentCount {
                    command: cmd,
                    count: 1,
                    arity: 0,
                    offset,
                });
            }
            let mut group = Vec::with_capacity(n);
            for k in 0..n {
                self.skip_separators();
                let is_flag = n == 7 && (k == 3 || k == 4);
                if is_flag {
                    group.push(self.read_flag()?);
                } else if self.at_number() {
                    group.push(self.read_number()?);
                } else {
                    return Err(ParseError::BadArgumentCount {
                        command: cmd,
                        count: groups.len() * n + k,
                        arity: n,
                        offset,
                    });
                }
            }
            groups.push(group);
        }
        if n > 0 && groups.is_empty() {
            return Err(ParseError::BadArgumentCount {
                command: cmd,
                count: 0,
                arity: n,
                offset,
            });
        }
        Ok(groups)
    }

    fn apply(&mut self, cmd: char, groups: &[Vec<f64>]) -> Result<(), ParseError> {
        let rel = cmd.is_ascii_lowercase();
        let base = |pen: Vector2<f64>| if rel { pen } else { Vector2::zeros() };
        match cmd.to_ascii_uppercase() {
            'M' => {
                for (i, g) in groups.iter().enumerate() {
                    let p = base(self.pen) + Vector2::new(g[0], g[1]);
                    if i == 0 {
                        let q = self.fixed(p)?;
                        self.finish_subpath();
                        self.subpath_start = p;
                        self.pen = p;
                        self.reopen = false;
                        self.current.push(q);
                    } else {
                        self.line_to(p)?;
                    }
                }
            }
            'L' => {
                for g in groups {
                    let p = base(self.pen) + Vector2::new(g[0], g[1]);
                    self.line_to(p)?;
                }
            }
            'H' => {
                for g in groups {
                    let x = if rel { self.pen.x + g[0] } else { g[0] };
                    self.line_to(Vector2::new(x, self.pen.y))?;
                }
            }
            'V' => {
                for g in groups {
                    let y = if rel { self.pen.y + g[0] } else { g[0] };
                    self.line_to(Vector2::new(self.pen.x, y))?;
                }
            }
            'A' => {
                for g in groups {
                    let p = base(self.pen) + Vector2::new(g[5], g[6]);
                    self.arc_to(g[0], g[1], g[2], g[3] != 0.0, g[4] != 0.0, p)?;
                }
            }
            _ => {
                // 'Z'
                self.ensure_open()?;
                if self.current.points.len() > 1 && self.current.first() == self.current.last() {
                    self.current.points.pop();
                }
                self.current.closed = true;
                self.pen = self.subpath_start;
                self.finish_subpath();
                self.reopen = true;
            }
        }
        Ok(())
    }

    fn finish_subpath(&mut self) {
        let c = std::mem::take(&mut self.current);
        if !c.points.is_empty() {
            self.out.push(c);
        }
    }

    /// Grid point for `p`, or an error naming the current command.
    fn fixed(&self, p: Vector2<f64>) -> Result<IPoint, ParseError> {
        try_to_fixed(p).ok_or(ParseError::CoordinateOutOfRange {
            offset: self.cmd_offset,
        })
    }

    fn ensure_open(&mut self) -> Result<(), ParseError> {
        if self.reopen {
            let q = self.fixed(self.subpath_start)?;
            self.reopen = false;
            self.current.push(q);
        }
        Ok(())
    }

    fn line_to(&mut self, p: Vector2<f64>) -> Result<(), ParseError> {
        let q = self.fixed(p)?;
        self.ensure_open()?;
        self.current.push(q);
        self.pen = p;
        Ok(())
    }

    /// Endpoint → center conversion, then uniform flattening by swept angle.
    fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        xrot_deg: f64,
        large: bool,
        sweep: bool,
        p: Vector2<f64>,
    ) -> Result<(), ParseError> {
        let target = self.fixed(p)?;
        self.ensure_open()?;
        let p0 = self.pen;
        if p0 == p {
            return Ok(());
        }
        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        if rx == 0.0 || ry == 0.0 {
            return self.line_to(p);
        }
        let phi = xrot_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();
        let dx2 = (p0.x - p.x) / 2.0;
        let dy2 = (p0.y - p.y) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }
        let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
        let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
        let sign = if large == sweep { -1.0 } else { 1.0 };
        let coef = if den > 0.0 {
            sign * (num / den).max(0.0).sqrt()
        } else {
            0.0
        };
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;
        let cx = cos_phi * cxp - sin_phi * cyp + (p0.x + p.x) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (p0.y + p.y) / 2.0;

        let u = Vector2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = Vector2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let theta1 = u.y.atan2(u.x);
        let mut dtheta = (u.x * v.y - u.y * v.x).atan2(u.dot(&v));
        if !sweep && dtheta > 0.0 {
            dtheta -= std::f64::consts::TAU;
        } else if sweep && dtheta < 0.0 {
            dtheta += std::f64::consts::TAU;
        }

        let n = self.cfg.arc_segments(dtheta);
        for k in 1..n {
            let th = theta1 + dtheta * k as f64 / n as f64;
            let (s, c) = th.sin_cos();
            let q = Vector2::new(
                cx + rx * cos_phi * c - ry * sin_phi * s,
                cy + rx * sin_phi * c + ry * cos_phi * s,
            );
            let q = self.fixed(q)?;
            self.current.push(q);
        }
        self.current.push(target);
        self.pen = p;
        Ok(())
    }

    fn skip_separators(&mut self) {
        while self.pos < self.src.len() {
            let b = self.src[self.pos];
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    #[inline]
    fn at_number(&self) -> bool {
        self.src
            .get(self.pos)
            .is_some_and(|&b| is_number_start(b as char))
    }

    fn read_flag(&mut self) -> Result<f64, ParseError> {
        let offset = self.pos;
        match self.src.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(0.0)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(1.0)
            }
            _ => Err(ParseError::InvalidFlag { offset }),
        }
    }

    /// `[sign] digits [. digits] [e [sign] digits]`; a second `.` ends the number.
    fn read_number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        let src = self.src;
        let mut i = self.pos;
        if i < src.len() && (src[i] == b'+' || src[i] == b'-') {
            i += 1;
        }
        let int_start = i;
        while i < src.len() && src[i].is_ascii_digit() {
            i += 1;
        }
        let mut digits = i - int_start;
        if i < src.len() && src[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < src.len() && src[i].is_ascii_digit() {
                i += 1;
            }
            digits += i - frac_start;
        }
        if digits == 0 {
            return Err(ParseError::InvalidNumber { offset: start });
        }
        if i < src.len() && (src[i] == b'e' || src[i] == b'E') {
            let mut j = i + 1;
            if j < src.len() && (src[j] == b'+' || src[j] == b'-') {
                j += 1;
            }
            let exp_start = j;
            while j < src.len() && src[j].is_ascii_digit() {
                j += 1;
            }
            if j == exp_start {
                return Err(ParseError::InvalidNumber { offset: start });
            }
            i = j;
        }
        let text = std::str::from_utf8(&src[start..i]).map_err(|_| ParseError::InvalidNumber { offset: start })?;
        let value: f64 = text
            .parse()
            .map_err(|_| ParseError::InvalidNumber { offset: start })?;
        if !value.is_finite() {
            return Err(ParseError::InvalidNumber { offset: start });
        }
        self.pos = i;
        Ok(value)
    }
}

#[inline]
fn is_number_start(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '-' || ch == '+' || ch == '.'
}
