//! Static text samples for text-processing exercises.
//!
//! Four small corpora about Africa: youth employment articles, a
//! historical chronicle, economic reports and an editorial. They are
//! data only; nothing in the reshaping pipeline reads them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Youth unemployment articles.
pub const YOUTH_EMPLOYMENT_ARTICLES: [&str; 3] = [
    "Youth unemployment remains a significant challenge in many African countries. Recent surveys show that in nations like South Africa, Nigeria, and Kenya, young people struggle to find stable employment. This has been linked to various factors such as lack of relevant skills, rapid urbanization, and slow economic growth.",
    "Across the African continent, startups and innovation hubs are rising to address the unemployment issue. Tech hubs in cities like Lagos and Nairobi are offering training programs that equip the youth with digital skills. Yet, while the tech sector offers promise, it cannot absorb the vast number of unemployed youths alone.",
    "Governments across Africa are urged to take proactive measures. Policy reforms, better education systems, and partnerships with the private sector can help alleviate the youth unemployment crisis. International organizations are also stepping in with initiatives aimed at skill development and job creation.",
];

/// Chronicle of African kingdoms and empires, with BC/AD dates.
pub const AFRICAN_MANUSCRIPT: &str = "
Before the common era, significant civilizations marked the African landscape. The Kingdom of Kush flourished around 1070 BC. Carthage's establishment dates back to 814 BC.
Transitioning to the common era, the Axum Empire's golden age began circa AD 100. The Mali Empire's vast stretches of influence started around AD 1235, with legendary rulers such as Mansa Musa.
Later on, the Songhai Empire dominated the Sahel region from AD 1430. The Rozwi Empire, though lesser-known, was pivotal between AD 1660 and AD 1866.
Zulu Kingdom's fierce resistance against colonial powers in the late AD 1800s remains an emblem of African resilience.
";

/// Agricultural and trade reports.
pub const ECONOMIC_REPORTS: [&str; 3] = [
    "The vast lands of Africa offer a significant potential for agricultural exports. Countries like Ethiopia, Ghana, and Côte d'Ivoire have already showcased their capacities in exporting coffee, cocoa, and palm oil respectively. However, the infrastructure challenges pose serious threats to the full realization of this potential.",
    "Intra-African trade has seen a steady rise with commodities like maize, millet, and yam seeing increased trade volumes. Regional economic communities are playing a vital role in promoting these trade channels. The African Continental Free Trade Area agreement stands as a testament to this.",
    "The global demand for African commodities, especially quinoa, teff, and shea butter, has skyrocketed. With the right investment in infrastructure and storage facilities, African nations can capture a larger share of the global market. Moreover, sustainable farming practices and value addition can fetch premium prices in international markets.",
];

/// Editorial naming many African countries.
pub const EDITORIAL_ARTICLE: &str = "
The ongoing infrastructure developments in Nigeria are seeing a boost with international partnerships. Ghana, on the other hand, is progressing rapidly in the tech industry. Kenya's innovative initiatives in wildlife conservation are gaining global traction.
South Africa's reconciliation journey post-apartheid era is being studied by many historians. Egypt, despite its political challenges, continues to allure tourists, particularly in the Giza region.
In West Africa, Côte d'Ivoire's and Senegal's economic growth is noteworthy. Algeria and Tunisia in the North are establishing trade agreements aiming to fortify their economic ties.
Uganda and Rwanda's collaborative efforts in East Africa are commendable. Botswana and Namibia, though lesser spoken of, are making significant strides in education and health sectors.
Meanwhile, nations like Sudan, Ethiopia, and Eritrea are at pivotal junctures, navigating their path amidst political challenges.
Zimbabwe's potential in the tourism sector remains untapped, and Angola's energy projects could reshape Southern African power dynamics.
";

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*").unwrap());

/// A built-in text sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Sample {
    YouthEmployment,
    AfricanManuscript,
    EconomicReports,
    Editorial,
}

impl Sample {
    pub fn all() -> [Sample; 4] {
        [
            Sample::YouthEmployment,
            Sample::AfricanManuscript,
            Sample::EconomicReports,
            Sample::Editorial,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Sample::YouthEmployment => "youth-employment",
            Sample::AfricanManuscript => "african-manuscript",
            Sample::EconomicReports => "economic-reports",
            Sample::Editorial => "editorial",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|s| s.name() == name)
    }

    /// Non-empty paragraphs, trimmed.
    pub fn paragraphs(&self) -> Vec<&'static str> {
        match self {
            Sample::YouthEmployment => YOUTH_EMPLOYMENT_ARTICLES.to_vec(),
            Sample::EconomicReports => ECONOMIC_REPORTS.to_vec(),
            Sample::AfricanManuscript => non_empty_lines(AFRICAN_MANUSCRIPT),
            Sample::Editorial => non_empty_lines(EDITORIAL_ARTICLE),
        }
    }

    /// Paragraphs joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs().join("\n")
    }

    /// Word tokens, apostrophe contractions kept whole.
    pub fn words(&self) -> Vec<&'static str> {
        self.paragraphs()
            .into_iter()
            .flat_map(|p| WORD.find_iter(p).map(|m| m.as_str()))
            .collect()
    }
}

fn non_empty_lines(text: &'static str) -> Vec<&'static str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
