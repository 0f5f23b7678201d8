use crate::models::{ToothNumber, ToothSet};

/// 临床遍历顺序：右上 -> 左上，左下 -> 右下
pub const CLINICAL_ORDER: [ToothNumber; 32] = [
    18, 17, 16, 15, 14, 13, 12, 11, //
    21, 22, 23, 24, 25, 26, 27, 28, //
    38, 37, 36, 35, 34, 33, 32, 31, //
    41, 42, 43, 44, 45, 46, 47, 48,
];

/// 牙位在临床顺序中的下标
pub fn clinical_index(tooth: ToothNumber) -> Option<usize> {
    CLINICAL_ORDER.iter().position(|&t| t == tooth)
}

/// 牙位集合 -> 紧凑区间字符串，例如 {18,17,16,11} -> "11, 16-18"
///
/// 按临床顺序排序后遍历，相邻判定看临床下标是否连续，而不是数值。
/// 输出时每个象限内从小到大：右上、左下两个象限的临床方向与数值相反，段序倒过来。
/// 不在 11-48 恒牙表中的牙位没有邻接关系，各自单独成段，排在最后并保持输入顺序。
pub fn format_range<'a, I>(teeth: I) -> String
where
    I: IntoIterator<Item = &'a ToothNumber>,
{
    let mut known: Vec<(usize, ToothNumber)> = Vec::new();
    let mut unknown = ToothSet::new();
    for &tooth in teeth {
        match clinical_index(tooth) {
            Some(idx) => known.push((idx, tooth)),
            None => {
                unknown.insert(tooth);
            }
        }
    }
    known.sort_unstable();
    known.dedup();

    // (起始牙位, 结束牙位)
    let mut runs: Vec<(ToothNumber, ToothNumber)> = Vec::new();
    let mut prev_idx: Option<usize> = None;
    for (idx, tooth) in known {
        let extends = prev_idx.is_some_and(|p| idx == p + 1);
        prev_idx = Some(idx);
        if extends {
            if let Some(run) = runs.last_mut() {
                run.1 = tooth;
                continue;
            }
        }
        runs.push((tooth, tooth));
    }

    let mut ordered = display_order(&runs);
    ordered.extend(unknown.into_iter().map(|t| (t, t)));

    ordered
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format_run(start, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn quadrant(tooth: ToothNumber) -> ToothNumber {
    tooth / 10
}

/// 临床方向与数值方向相反的象限
fn reads_backwards(quadrant: ToothNumber) -> bool {
    quadrant == 1 || quadrant == 3
}

/// 按段起点所在象限切块，右上/左下象限内的段倒序输出
fn display_order(runs: &[(ToothNumber, ToothNumber)]) -> Vec<(ToothNumber, ToothNumber)> {
    let mut ordered = Vec::with_capacity(runs.len());
    let mut block_start = 0;
    for i in 1..=runs.len() {
        let block_ends = i == runs.len() || quadrant(runs[i].0) != quadrant(runs[block_start].0);
        if !block_ends {
            continue;
        }
        let block = &runs[block_start..i];
        if reads_backwards(quadrant(block[0].0)) {
            ordered.extend(block.iter().rev().copied());
        } else {
            ordered.extend(block.iter().copied());
        }
        block_start = i;
    }
    ordered
}

/// 同一象限内按数值小到大显示 ("16-18")，跨象限保持临床方向 ("12-22")
fn format_run(start: ToothNumber, end: ToothNumber) -> String {
    if start / 10 == end / 10 && start > end {
        format!("{}-{}", end, start)
    } else {
        format!("{}-{}", start, end)
    }
}
