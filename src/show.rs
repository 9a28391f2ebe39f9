use itertools::Itertools;

use crate::alphabet::Symbol;

/// This method should display the time in a sensible format. If it is less than a second, it should
/// only display the milliseconds and microseconds. If it is less than a minute, it should display
/// the seconds and milliseconds. If it is less than an hour, it should display the minutes and
/// seconds. If it is less than a day, it should display the hours and minutes. If it is more than a
/// day, it should display the days and hours.
pub fn show_duration(duration: std::time::Duration) -> String {
    let ms = duration.as_millis();
    let us = duration.as_micros();
    let s = duration.as_secs();
    let m = s / 60;
    let h = m / 60;
    let d = h / 24;

    if d > 0 {
        format!("{}d {}h", d, h % 24)
    } else if h > 0 {
        format!("{}h {}m", h, m % 60)
    } else if m > 0 {
        format!("{}m {}s", m, s % 60)
    } else if s > 0 {
        format!("{}s {}ms", s, ms % 1000)
    } else if ms > 0 {
        format!("{}ms {}us", ms, us % 1000)
    } else {
        format!("{}us", us)
    }
}

/// Helper trait which can be used to display states, words, automata and such.
pub trait Show {
    /// Returns a human readable representation of `self`. For a state that should be
    /// for example q1, q2, ... and for a word [1, 2, 1] it is "121".
    /// Just use something that makes sense. This is mainly used for debugging purposes.
    fn show(&self) -> String;
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl Show for [Symbol] {
    fn show(&self) -> String {
        format!("[{}]", self.iter().join(", "))
    }
}

impl Show for Vec<Symbol> {
    fn show(&self) -> String {
        self.as_slice().show()
    }
}

impl Show for f64 {
    fn show(&self) -> String {
        format!("{self:.5}")
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{show_duration, Show};

    #[test]
    fn durations() {
        assert_eq!(show_duration(Duration::from_micros(12)), "12us");
        assert_eq!(show_duration(Duration::from_millis(1500)), "1s 500ms");
        assert_eq!(show_duration(Duration::from_secs(185)), "3m 5s");
    }

    #[test]
    fn words() {
        assert_eq!(vec![1u32, 2, 1].show(), "[1, 2, 1]");
        assert_eq!(true.show(), "+");
    }
}
