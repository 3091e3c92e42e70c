//! Built-in prompt tables.

use crate::types::{Difficulty, Prompt, PromptKind, SpecialBehavior, Stage};

/// (difficulty, text, tags)
type QuestionRow = (u8, &'static str, &'static [&'static str]);

const STAGE_ONE_QUESTIONS: &[QuestionRow] = &[
    (1, "What would you do if you won the lottery today?", &["dreams"]),
    (1, "What would be your ideal weekend?", &["lifestyle"]),
    (2, "What's a hot take you believe in?", &["opinions"]),
    (1, "What's something you're working on or plan to do in the near future?", &["goals"]),
    (1, "Any hyper-fixations in the past?", &["hobbies"]),
    (2, "What's a skill or hobby you've picked up that surprised you in some way?", &["hobbies"]),
];

const STAGE_TWO_QUESTIONS: &[QuestionRow] = &[
    (2, "List three things that you are looking for in a friend/partner", &["relationships"]),
    (1, "What's your favorite piece of media, and why?", &["media"]),
    (1, "Things that a friend does that annoys you.", &["relationships"]),
    (2, "Who in your life has influenced you the most, and how?", &["people"]),
    (2, "How do you know when you can really trust someone?", &["relationships"]),
    (1, "If you could spend a year doing/learning anything without worrying about money or practicality, what would it be?", &["dreams"]),
    (2, "What setting do you feel most like yourself?", &["self"]),
    (1, "What's your ideal hangout like?", &["lifestyle"]),
    (3, "What's a trait about you that you would like to change?", &["self"]),
    (2, "When you're facing a problem, what do you usually do?", &["self"]),
    (3, "What's a fear you've overcome, or one you're still working on?", &["self"]),
    (2, "Difference between who you are with friends and with family?", &["people"]),
    (2, "Something you've always wanted to get into but had trouble with?", &["hobbies"]),
    (2, "What's something you used to prioritize that you don't anymore?", &["self"]),
    (1, "What's something you could talk about for hours without getting bored?", &["hobbies"]),
    (1, "Most serious injury?", &["stories"]),
    (2, "What does \"success\" mean to you?", &["values"]),
    (2, "If you could give your younger self one piece of insight, what would it be?", &["past"]),
    (2, "What's a hobby you gave up on and why? Would you like to try again?", &["hobbies"]),
    (1, "What's your ideal job?", &["goals"]),
    (2, "If you could relive a day from your past exactly as it happened, which would you choose?", &["past"]),
    (3, "What's a version of your life you sometimes wonder about, a path you didn't take?", &["past"]),
    (3, "Choosing between what was expected of you and what you want.", &["values"]),
    (1, "What's the most exciting part of visiting a new country for you?", &["travel"]),
    (2, "How do you feel about silence in conversations or friendships?", &["relationships"]),
    (1, "When do you prefer to be alone rather than with people or vice versa?", &["self"]),
    (2, "What kind of event/environment do you think inspires change?", &["values"]),
    (1, "What makes time go by faster for you?", &["lifestyle"]),
    (3, "When did you grow up to be \"you,\" and why?", &["self"]),
    (1, "Share a life hack that you think more people could follow.", &["lifestyle"]),
];

const STAGE_THREE_QUESTIONS: &[QuestionRow] = &[
    (3, "What do you think about marriage/having a child?", &["relationships"]),
    (3, "What's one thing you would want to change about your past if you had to pick one?", &["past"]),
    (1, "What do you tend to do in a team?", &["people"]),
    (3, "What pattern do you keep repeating in your life that you wish you could break?", &["self"]),
    (3, "What's something you know about yourself that you rarely admit out loud?", &["self"]),
    (3, "When have you felt most alone, even when surrounded by people?", &["feelings"]),
    (2, "One thing you've always wanted to do but never found the people to do it with?", &["dreams"]),
    (2, "When are you most \"in the zone\"?", &["self"]),
    (2, "What are the constants throughout your life?", &["values"]),
];

/// (difficulty, text, special)
type ActivityRow = (u8, &'static str, SpecialBehavior);

const ACTIVITIES: &[ActivityRow] = &[
    (2, "2 truths 1 lie", SpecialBehavior::None),
    (2, "Choose a photo from your library and tell its story", SpecialBehavior::None),
    (2, "Share your first impression of a player at the table", SpecialBehavior::OffersReroll),
    (1, "Show your lock screen/home screen and explain why", SpecialBehavior::None),
    (1, "Show the latest picture in your gallery", SpecialBehavior::None),
    (2, "Show a picture that makes no sense out of context", SpecialBehavior::None),
    (1, "Show the last thing you photographed that wasn't a person", SpecialBehavior::None),
    (1, "Show a photo that represents where you spend a lot of time", SpecialBehavior::None),
    (2, "Show a childhood photo or a younger photo", SpecialBehavior::None),
    (1, "Give a compliment to a player", SpecialBehavior::OffersReroll),
    (2, "Give a compliment to EVERYONE", SpecialBehavior::None),
    (3, "Hold a plank during the next answer", SpecialBehavior::None),
    (1, "Take a group photo", SpecialBehavior::None),
    (2, "Take a photo of each player", SpecialBehavior::None),
    (2, "Tell a childhood story in 10 seconds", SpecialBehavior::None),
    (1, "Find one thing you and another player have in common", SpecialBehavior::None),
    (1, "Take a photo of a player", SpecialBehavior::OffersReroll),
    (2, "On the count of three...", SpecialBehavior::TriggersPointing),
];

/// (stage affinity, difficulty, statement)
type PointingRow = (Stage, u8, &'static str);

const POINTING: &[PointingRow] = &[
    (Stage::S1, 1, "has the cleanest room"),
    (Stage::S1, 1, "has the messiest room"),
    (Stage::S1, 1, "takes the longest to get ready"),
    (Stage::S2, 2, "is secretly the best at flirting"),
    (Stage::S1, 1, "gives the strongest green flag energy"),
    (Stage::S2, 2, "falls in love the fastest"),
    (Stage::S2, 2, "gives the best relationship advice"),
    (Stage::S2, 2, "gives the worst relationship advice"),
    (Stage::S2, 2, "is secretly the most romantic"),
    (Stage::S1, 1, "looks intimidating but is actually soft"),
    (Stage::S1, 1, "has main-character energy"),
    (Stage::S1, 1, "is the best listener"),
    (Stage::S2, 2, "you'd text at 2 a.m."),
    (Stage::S1, 1, "asks the best questions"),
    (Stage::S2, 2, "seems like they smell really good"),
    (Stage::S2, 2, "would give the best first impression on parents"),
    (Stage::S3, 3, "would get the most people's numbers in one night"),
    (Stage::S1, 1, "has the most interesting stories"),
    (Stage::S1, 1, "has the best fashion sense"),
    (Stage::S1, 1, "feels like they have a secret talent no one expects"),
    (Stage::S1, 1, "looks like they're good at dancing"),
    (Stage::S1, 1, "has the best smile"),
    (Stage::S1, 1, "would survive the longest in a zombie apocalypse"),
    (Stage::S1, 2, "would fall for an obvious scam"),
    (Stage::S2, 2, "would say \"I'm not drunk\" when they clearly are"),
    (Stage::S3, 3, "would be the best kisser"),
    (Stage::S3, 3, "has the best \"date me\" aura"),
    (Stage::S3, 3, "has the strongest silent rizz"),
];

fn difficulty(value: u8) -> Option<Difficulty> {
    Difficulty::new(value).ok()
}

fn question_pool(stage: Stage, prefix: &str, rows: &[QuestionRow]) -> Vec<Prompt> {
    rows.iter()
        .enumerate()
        .map(|(i, (level, text, tags))| Prompt {
            id: format!("{}-{:02}", prefix, i + 1),
            text: (*text).to_string(),
            stage,
            difficulty: difficulty(*level),
            kind: PromptKind::Question,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            special: SpecialBehavior::None,
        })
        .collect()
}

pub(crate) fn questions() -> Vec<Prompt> {
    let mut pool = question_pool(Stage::S1, "q-s1", STAGE_ONE_QUESTIONS);
    pool.extend(question_pool(Stage::S2, "q-s2", STAGE_TWO_QUESTIONS));
    pool.extend(question_pool(Stage::S3, "q-s3", STAGE_THREE_QUESTIONS));
    pool
}

pub(crate) fn activities() -> Vec<Prompt> {
    ACTIVITIES
        .iter()
        .enumerate()
        .map(|(i, (level, text, special))| Prompt {
            id: format!("act-{:02}", i + 1),
            text: (*text).to_string(),
            stage: Stage::S1,
            difficulty: difficulty(*level),
            kind: PromptKind::Activity,
            tags: Vec::new(),
            special: *special,
        })
        .collect()
}

pub(crate) fn pointing() -> Vec<Prompt> {
    POINTING
        .iter()
        .enumerate()
        .map(|(i, (stage, level, text))| Prompt {
            id: format!("pt-{:02}", i + 1),
            text: (*text).to_string(),
            stage: *stage,
            difficulty: difficulty(*level),
            kind: PromptKind::Pointing,
            tags: Vec::new(),
            special: SpecialBehavior::None,
        })
        .collect()
}
