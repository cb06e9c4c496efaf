//! Face similarity math
//! Euclidean distance over (race, emotion, oldness) and top-k ranking

use crate::face::Face;

/// Euclidean distance
/// dist = sqrt(d_race^2 + d_emotion^2 + d_oldness^2)
pub fn distance(left: &Face, right: &Face) -> f64 {
    let d_race = left.race() as f64 - right.race() as f64;
    let d_emotion = left.emotion() as f64 - right.emotion() as f64;
    let d_oldness = left.oldness() as f64 - right.oldness() as f64;

    (d_race * d_race + d_emotion * d_emotion + d_oldness * d_oldness).sqrt()
}

/// Keeps the `limit` candidates closest to `query`, nearest first.
///
/// Equal distances keep the order the candidates were yielded in, so a
/// caller iterating by ascending id gets ascending id as the tie-break.
pub fn nearest<'a, I>(query: &Face, candidates: I, limit: usize) -> Vec<(&'a Face, f64)>
where
    I: IntoIterator<Item = &'a Face>,
{
    let mut ranked: Vec<(&'a Face, f64)> = Vec::with_capacity(limit + 1);
    if limit == 0 {
        return ranked;
    }

    for candidate in candidates {
        let dist = distance(query, candidate);
        if ranked.len() == limit && dist >= ranked[limit - 1].1 {
            continue;
        }
        // after every equal distance, so earlier candidates stay ahead
        let insert_index = ranked.partition_point(|&(_, d)| d <= dist);
        ranked.insert(insert_index, (candidate, dist));
        ranked.truncate(limit);
    }

    ranked
}
