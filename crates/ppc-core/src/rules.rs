//! # Regulatory Rubric
//!
//! Fixed constants of Res. CNE/CP nº 4/2024 for teacher-education programs.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! The aggregation and validation modules read them; nothing writes them.

use crate::{Hours, Nucleus, Percentage};

/// Hours credited per weekly class of a `Disciplina` (18-week term).
pub const HOURS_PER_WEEKLY_CLASS: u64 = 18;

/// Minimum total hours of the whole course.
pub const COURSE_MINIMUM_HOURS: Hours = Hours::from_whole(3200);

/// Minimum share of extension hours over the course total.
pub const EXTENSION_MINIMUM_PERCENT: Percentage = Percentage::from_whole(10);

/// Minimum hours of a single supervised internship (nucleus IV).
pub const INTERNSHIP_MINIMUM_HOURS: Hours = Hours::from_whole(400);

/// Highest academic period a component may be tied to.
pub const MAX_SEMESTER: u8 = 20;

/// Minimum hours per nucleus, in `Nucleus::ALL` order.
pub const NUCLEUS_MINIMUM_HOURS: [Hours; 4] = [
    Hours::from_whole(880),
    Hours::from_whole(1600),
    Hours::from_whole(320),
    Hours::from_whole(400),
];

/// Themes of Art. 13 (a–i) that a nucleus I component selects from.
pub const ART13_THEMES: [&str; 9] = [
    "a) Princípios e fundamentos sociológicos, filosóficos, históricos e epistemológicos da educação",
    "b) Princípios, valores e atitudes comprometidos com a justiça social, reconhecimento, respeito e apreço à diversidade, promoção da participação, da equidade e da inclusão e gestão democrática",
    "c) Observação, análise, planejamento, desenvolvimento e avaliação de processos educativos, experiências pedagógicas e de situações de ensino e aprendizagem em instituições de Educação Básica",
    "d) Conhecimento multidimensional e interdisciplinar sobre o ser humano e práticas educativas, incluindo conhecimento de processos de desenvolvimento de crianças, adolescentes, jovens e adultos, nas dimensões física, cognitiva, afetiva, estética, cultural, lúdica, artística, ética e biopsicossocial",
    "e) Diagnóstico e análise das necessidades e aspirações dos diferentes segmentos da sociedade, relativas à educação, sendo capaz de identificar diferentes forças e interesses, de captar contradições e de considerá-los nos planos pedagógicos, no ensino e, consequentemente, nos processos de aprendizagem",
    "f) Pesquisa e estudo da legislação educacional, dos processos de organização e gestão do trabalho dos profissionais do magistério da educação escolar básica, das políticas de financiamento, da avaliação e do currículo",
    "g) Pesquisa e estudo das relações entre educação e trabalho, educação e diversidade, educação e comunicação, direitos humanos, cidadania, educação ambiental, entre outras problemáticas centrais da sociedade contemporânea",
    "h) Estudos de aspectos éticos, didáticos e comportamentais no contexto do exercício profissional, articulando o saber acadêmico, a pesquisa, a extensão e a prática educativa",
    "i) Conhecimento sobre diferentes estratégias de planejamento e avaliação das aprendizagens, centradas no desenvolvimento pleno dos estudantes da Educação Básica",
];

/// Suggested internship stages. Free text is accepted as well.
pub const INTERNSHIP_STAGES: [&str; 4] = [
    "Observação",
    "Regência Parcial",
    "Regência Final",
    "Outro",
];

/// Minimum hours of a nucleus.
#[must_use]
pub const fn nucleus_minimum(nucleus: Nucleus) -> Hours {
    NUCLEUS_MINIMUM_HOURS[nucleus.index()]
}
