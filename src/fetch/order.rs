use crate::model::{Lane, Node};
use std::cmp::Ordering;

/// Order a lane for display.
///
/// Data lanes are alphabetical by label (then link label, then id), comparing
/// digit runs numerically so `d2` sorts before `d10`. Process lanes are newest
/// first by creation time; nodes without a timestamp go last.
pub fn sort_lane(lane: Lane, nodes: &mut [Node]) {
    if lane.is_process() {
        nodes.sort_by(|a, b| {
            match (a.raw.ctime, b.raw.ctime) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
            .then_with(|| a.id.cmp(&b.id))
        });
    } else {
        nodes.sort_by(|a, b| {
            natural_cmp(&a.label, &b.label)
                .then_with(|| natural_cmp(a.link_label(), b.link_label()))
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

/// Case-insensitive comparison treating runs of ASCII digits as numbers.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                let ordering = compare_digit_runs(&lhs, &rhs);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
