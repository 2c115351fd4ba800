use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Basico,
    Profissional,
    Premium,
    Corporativo,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PlanDetails {
    pub title: &'static str,
    pub description: &'static str,
    pub monthly_cents: u64,
    /// Corporate contracts are quoted from a starting price.
    pub starting_price: bool,
    pub features: &'static [&'static str],
}

static BASICO: PlanDetails = PlanDetails {
    title: "Básico",
    description: "Ideal para atletas iniciantes que desejam iniciar sua presença digital.",
    monthly_cents: 29_900,
    starting_price: false,
    features: &[
        "Criação e otimização de perfis nas redes sociais",
        "4 postagens mensais",
        "Acompanhamento básico de engajamento",
        "Relatórios mensais com dados principais",
    ],
};

static PROFISSIONAL: PlanDetails = PlanDetails {
    title: "Profissional",
    description: "Voltado para atletas ativos em competições, que buscam visibilidade e análise de resultados.",
    monthly_cents: 89_900,
    starting_price: false,
    features: &[
        "Gestão completa de redes sociais (até 2 plataformas)",
        "8 postagens mensais + stories semanais",
        "Análise de engajamento com IA preditiva",
        "Relatório de desempenho esportivo e digital",
        "Consultoria de imagem",
    ],
};

static PREMIUM: PlanDetails = PlanDetails {
    title: "Premium",
    description: "Indicado para atletas de alto rendimento ou com patrocinadores.",
    monthly_cents: 179_900,
    starting_price: false,
    features: &[
        "Gestão de redes sociais (3 plataformas)",
        "Produção de conteúdo profissional (foto/vídeo)",
        "Monitoramento com IA (análise de sentimentos)",
        "Relatórios detalhados",
        "Planejamento estratégico e assessoria esportiva",
    ],
};

static CORPORATIVO: PlanDetails = PlanDetails {
    title: "Corporativo",
    description: "Soluções completas de marketing e IA para instituições, federações ou patrocinadores.",
    monthly_cents: 450_000,
    starting_price: true,
    features: &[
        "Campanhas de patrocínio com atletas",
        "Dashboards comparativos",
        "Consultoria em inclusão",
        "Relatórios executivos personalizados",
        "Suporte dedicado e consultoria estratégica",
    ],
};

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Basico, Plan::Profissional, Plan::Premium, Plan::Corporativo];

    /// Value of the `data-plan` attribute on the plan cards.
    pub fn key(self) -> &'static str {
        match self {
            Plan::Basico => "basico",
            Plan::Profissional => "profissional",
            Plan::Premium => "premium",
            Plan::Corporativo => "corporativo",
        }
    }

    pub fn details(self) -> &'static PlanDetails {
        match self {
            Plan::Basico => &BASICO,
            Plan::Profissional => &PROFISSIONAL,
            Plan::Premium => &PREMIUM,
            Plan::Corporativo => &CORPORATIVO,
        }
    }

    pub fn checkout_path(self) -> String {
        format!("/checkout?plano={}", self.key())
    }

    /// Reads the `plano` parameter of a checkout query string, with or without
    /// the leading `?`.
    pub fn from_query(query: &str) -> Result<Plan, ParseError> {
        let raw = query
            .trim_start_matches('?')
            .split('&')
            .find_map(|pair| pair.strip_prefix("plano="))
            .ok_or_else(|| ParseError::InvalidQuery(query.to_string()))?;
        let key = urlencoding::decode(raw).map_err(|_| ParseError::InvalidQuery(raw.to_string()))?;
        key.parse()
    }

    /// "R$ 899,00 / mês", or "A partir de R$ 4.500,00 / mês" for quoted plans.
    pub fn price_label(self) -> String {
        let details = self.details();
        let price = format!("{} / mês", format_brl(details.monthly_cents));
        if details.starting_price {
            format!("A partir de {price}")
        } else {
            price
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.details().title)
    }
}

impl FromStr for Plan {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Plan::ALL
            .into_iter()
            .find(|plan| plan.key() == key)
            .ok_or_else(|| ParseError::UnknownPlan(s.to_string()))
    }
}

/// Formats cents as Brazilian reais: `R$ 1.799,00`.
pub fn format_brl(cents: u64) -> String {
    let reais = (cents / 100).to_string();
    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (idx, ch) in reais.chars().enumerate() {
        if idx > 0 && (reais.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("R$ {},{:02}", grouped, cents % 100)
}
