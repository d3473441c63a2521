// Demo poem set
// Eight poems from the Hyakunin Isshu, enough for the grid and table variants.
// Images are placeholders until real card art is bundled.
use crate::poem::Poem;

pub const DEMO_POEMS: &[Poem] = &[
    Poem::from_static(
        1,
        "秋の田の",
        "かりほの庵の 苫をあらみ わが衣手は 露にぬれつつ",
        "天智天皇",
        "https://placehold.co/600x400/a7c957/ffffff?text=1",
    ),
    Poem::from_static(
        2,
        "春過ぎて",
        "夏来にけらし 白妙の 衣ほすてふ 天の香具山",
        "持統天皇",
        "https://placehold.co/600x400/f2e8cf/ffffff?text=2",
    ),
    Poem::from_static(
        3,
        "あしびきの",
        "山鳥の尾の しだり尾の ながながし夜を ひとりかも寝む",
        "柿本人麻呂",
        "https://placehold.co/600x400/bc4749/ffffff?text=3",
    ),
    Poem::from_static(
        4,
        "田子の浦に",
        "うち出でてみれば 白妙の 富士の高嶺に 雪は降りつつ",
        "山部赤人",
        "https://placehold.co/600x400/6a994e/ffffff?text=4",
    ),
    Poem::from_static(
        5,
        "奥山に",
        "紅葉踏み分け 鳴く鹿の 声聞く時ぞ 秋は悲しき",
        "猿丸大夫",
        "https://placehold.co/600x400/386641/ffffff?text=5",
    ),
    Poem::from_static(
        6,
        "かささぎの",
        "渡せる橋に おく霜の 白きを見れば 夜ぞ更けにける",
        "中納言家持",
        "https://placehold.co/600x400/8a5a44/ffffff?text=6",
    ),
    Poem::from_static(
        7,
        "天の原",
        "ふりさけ見れば 春日なる 三笠の山に 出でし月かも",
        "阿倍仲麻呂",
        "https://placehold.co/600x400/4f772d/ffffff?text=7",
    ),
    Poem::from_static(
        8,
        "わが庵は",
        "都のたつみ しかぞ住む 世をうぢ山と 人はいふなり",
        "喜撰法師",
        "https://placehold.co/600x400/e56b6f/ffffff?text=8",
    ),
];

/// Shown in place of a card image that failed to load.
pub const FALLBACK_IMAGE: &str = "https://placehold.co/600x400/cccccc/ffffff?text=Error";
