/// Total order over content maturity ratings used for candidate filtering.
///
/// Unknown or missing ratings score as the most restrictive level, so a
/// mislabeled video can never slip past a tenant's ceiling.
pub fn is_allowed(video_rating: &str, policy_rating: &str) -> bool {
    score(video_rating) <= score(policy_rating)
}

fn score(rating: &str) -> u8 {
    match rating.trim().to_uppercase().as_str() {
        "G" => 0,
        "PG" => 1,
        "PG13" | "PG-13" => 2,
        "R" => 3,
        "NC17" | "NC-17" => 4,
        _ => 4,
    }
}
