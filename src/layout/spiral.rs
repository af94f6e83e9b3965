/// Rectangular Archimedean spiral around the origin.
///
/// Steps `e` pixels vertically and `e * width / height` horizontally so
/// the rings keep the canvas aspect ratio.
pub(crate) struct ArchimedeanSpiral {
    t: i32,
    dt: i32,
    dx: f64,
    dy: f64,
    ratio: f64,
    e: f64,
}

impl ArchimedeanSpiral {
    pub(crate) fn new(width: i32, height: i32, dt: i32) -> Self {
        let e = 4.0;
        let ratio = e * width as f64 / height.max(1) as f64;
        Self {
            t: 0,
            dt,
            dx: 0.0,
            dy: 0.0,
            ratio,
            e,
        }
    }
}

impl Iterator for ArchimedeanSpiral {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        self.t += self.dt;
        let sign = if self.t < 0 { -1.0 } else { 1.0 };
        let idx = ((1.0 + 4.0 * sign * self.t as f64).sqrt() - sign) as i32 & 3;
        match idx {
            0 => self.dx += self.ratio,
            1 => self.dy += self.e,
            2 => self.dx -= self.ratio,
            _ => self.dy -= self.e,
        }
        Some((self.dx as i32, self.dy as i32))
    }
}

/// Offsets from the canvas centre, starting at the centre itself and
/// ending once a ring lies entirely outside a `width` x `height` canvas.
pub(crate) fn offsets(width: u32, height: u32, dt: i32) -> impl Iterator<Item = (i32, i32)> {
    let (w, h) = (width as i32, height as i32);
    let (half_w, half_h) = (w / 2 + 1, h / 2 + 1);
    std::iter::once((0, 0))
        .chain(ArchimedeanSpiral::new(w, h, dt))
        .take_while(move |(dx, dy)| dx.abs() <= half_w || dy.abs() <= half_h)
}
