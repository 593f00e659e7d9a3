#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Below this many elements the work stays on the calling thread.
#[cfg(not(target_arch = "wasm32"))]
const PARALLEL_THRESHOLD: usize = 1024;

/// Builds `len` elements from their index, in index order.
pub(crate) fn collect_indexed<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        if len >= PARALLEL_THRESHOLD {
            return (0..len).into_par_iter().map(&f).collect();
        }
    }

    (0..len).map(f).collect()
}

/// Rewrites every element of `values` in place.
pub(crate) fn update_each<T, F>(values: &mut [T], f: F)
where
    T: Send,
    F: Fn(&mut T) + Sync + Send,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        if values.len() >= PARALLEL_THRESHOLD {
            values.par_iter_mut().for_each(&f);
            return;
        }
    }

    values.iter_mut().for_each(f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_and_small_inputs_agree() {
        for len in [3, 5000] {
            let squares = collect_indexed(len, |i| i * i);
            assert_eq!(squares.len(), len);
            assert!(squares.iter().enumerate().all(|(i, v)| *v == i * i));

            let mut values = squares;
            update_each(&mut values, |v| *v += 1);
            assert!(values.iter().enumerate().all(|(i, v)| *v == i * i + 1));
        }
    }
}
